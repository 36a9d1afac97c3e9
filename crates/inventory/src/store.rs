//! Persistence ports.
//!
//! Writes go through [`InventoryStore::transaction`]: the closure receives an
//! [`InventoryTx`] and everything it did is committed when it returns `Ok`,
//! and discarded when it returns `Err`.

use watchstock_core::{BatchId, BrandId, ImageId, WatchId};

use crate::error::InventoryResult;
use crate::model::{Batch, Brand, Watch, WatchImage};
use crate::values::WatchKey;

/// Operations available inside a transaction.
pub trait InventoryTx {
    fn brand(&self, id: BrandId) -> InventoryResult<Option<Brand>>;

    /// Get-or-create by unique name.
    fn brand_first_or_create(&mut self, name: &str) -> InventoryResult<Brand>;

    fn batch(&self, id: BatchId) -> InventoryResult<Option<Batch>>;

    /// Get-or-create by unique name.
    fn batch_first_or_create(&mut self, name: &str) -> InventoryResult<Batch>;

    /// Live (not soft-deleted) watch matching `key`.
    fn find_watch(&self, key: &WatchKey) -> InventoryResult<Option<Watch>>;

    /// Whether a live watch other than `except` already uses `sku`.
    fn sku_taken(&self, sku: &str, except: Option<WatchId>) -> InventoryResult<bool>;

    fn insert_watch(&mut self, watch: Watch) -> InventoryResult<()>;

    fn update_watch(&mut self, watch: Watch) -> InventoryResult<()>;

    /// Images of a watch, ordered by `order_index`.
    fn images(&self, watch_id: WatchId) -> InventoryResult<Vec<WatchImage>>;

    /// Insert or replace an image record.
    fn save_image(&mut self, image: WatchImage) -> InventoryResult<()>;

    fn delete_image(&mut self, id: ImageId) -> InventoryResult<()>;
}

/// Transactional inventory storage.
pub trait InventoryStore: Send + Sync {
    /// Run `work` atomically.
    fn transaction<T, F>(&self, work: F) -> InventoryResult<T>
    where
        F: FnOnce(&mut dyn InventoryTx) -> InventoryResult<T>;

    /// Read-only lookup outside of a transaction.
    fn watch(&self, key: &WatchKey) -> InventoryResult<Option<Watch>> {
        self.transaction(|tx| tx.find_watch(key))
    }

    fn images(&self, watch_id: WatchId) -> InventoryResult<Vec<WatchImage>> {
        self.transaction(|tx| tx.images(watch_id))
    }

    fn brand(&self, id: BrandId) -> InventoryResult<Option<Brand>> {
        self.transaction(|tx| tx.brand(id))
    }

    fn batch(&self, id: BatchId) -> InventoryResult<Option<Batch>> {
        self.transaction(|tx| tx.batch(id))
    }
}

impl<S> InventoryStore for std::sync::Arc<S>
where
    S: InventoryStore,
{
    fn transaction<T, F>(&self, work: F) -> InventoryResult<T>
    where
        F: FnOnce(&mut dyn InventoryTx) -> InventoryResult<T>,
    {
        (**self).transaction(work)
    }
}
