//! Watch deletion (soft delete with image cleanup).

use chrono::Utc;
use tracing::info;

use watchstock_core::DomainError;

use crate::error::InventoryResult;
use crate::model::Watch;
use crate::observer::WatchObserver;
use crate::store::InventoryStore;
use crate::values::WatchKey;

pub struct DeleteWatch<S> {
    store: S,
    observer: WatchObserver,
}

impl<S: InventoryStore> DeleteWatch<S> {
    pub fn new(store: S, observer: WatchObserver) -> Self {
        Self { store, observer }
    }

    /// Remove the watch's images, then mark the watch deleted.
    ///
    /// Both happen in one transaction; a failure keeps the image records.
    pub fn execute(&self, key: &WatchKey) -> InventoryResult<Watch> {
        self.store.transaction(|tx| {
            let mut watch = tx.find_watch(key)?.ok_or_else(DomainError::not_found)?;

            let images = self.observer.deleting(tx, &watch)?;

            let now = Utc::now();
            watch.deleted_at = Some(now);
            watch.updated_at = Some(now);
            tx.update_watch(watch.clone())?;

            info!(watch_id = %watch.id, images, "watch deleted");
            Ok(watch)
        })
    }
}
