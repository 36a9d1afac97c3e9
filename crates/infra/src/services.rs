//! Wiring of the inventory workflows over concrete adapters.

use std::sync::Arc;

use tracing::debug;

use watchstock_core::{DomainError, WatchId};
use watchstock_inventory::{
    BlobStorage, CurrentUser, DeleteWatch, InventoryError, InventoryResult, InventoryStore,
    PrefixSkuGenerator, SkuGenerator, StoreWatchRequest, StoredImageSync, UpdateOrCreateWatch,
    Watch, WatchKey, WatchObserver, WatchRelations, WatchResource, WatchValues,
};

use crate::config::AppConfig;

/// Inventory use cases bound to one store, one public disk and one acting user.
pub struct InventoryServices<S> {
    store: Arc<S>,
    storage: Arc<dyn BlobStorage>,
    current_user: Arc<dyn CurrentUser>,
    upsert: UpdateOrCreateWatch<Arc<S>>,
    delete: DeleteWatch<Arc<S>>,
}

impl<S: InventoryStore> InventoryServices<S> {
    pub fn new(
        store: Arc<S>,
        storage: Arc<dyn BlobStorage>,
        current_user: Arc<dyn CurrentUser>,
        config: &AppConfig,
    ) -> Self {
        let skus: Arc<dyn SkuGenerator> = Arc::new(PrefixSkuGenerator::default());
        let observer =
            WatchObserver::new(Arc::clone(&current_user), Arc::clone(&storage), skus);

        let mut upsert = UpdateOrCreateWatch::new(
            Arc::clone(&store),
            observer.clone(),
            Arc::new(StoredImageSync::new(Arc::clone(&storage))),
        );
        if let Some(location) = &config.default_location {
            upsert = upsert.with_default_location(location.clone());
        }

        Self {
            delete: DeleteWatch::new(Arc::clone(&store), observer),
            store,
            storage,
            current_user,
            upsert,
        }
    }

    pub fn store(&self) -> &S {
        self.store.as_ref()
    }

    /// Validate a create payload and save it.
    ///
    /// An explicit SKU keys the upsert; otherwise a fresh id is used and the
    /// SKU is generated.
    pub fn store_watch(&self, request: &StoreWatchRequest) -> InventoryResult<Watch> {
        let taken = |sku: &str| self.store.transaction(|tx| tx.sku_taken(sku, None));
        let values = request.validate(self.current_user.as_ref(), &taken)?;

        let key = match values.sku.clone() {
            Some(sku) => WatchKey::Sku(sku),
            None => WatchKey::Id(WatchId::new()),
        };
        self.upsert.execute(key, values)
    }

    /// Update (or create) the watch identified by `key`.
    pub fn save_watch(&self, key: WatchKey, values: WatchValues) -> InventoryResult<Watch> {
        if !self.current_user.is_authenticated() {
            return Err(InventoryError::Unauthorized);
        }
        self.upsert.execute(key, values)
    }

    pub fn delete_watch(&self, key: &WatchKey) -> InventoryResult<Watch> {
        if !self.current_user.is_authenticated() {
            return Err(InventoryError::Unauthorized);
        }
        self.delete.execute(key)
    }

    /// Load a live watch with its brand, batch, status, location and images.
    pub fn show(&self, key: &WatchKey) -> InventoryResult<WatchResource> {
        let watch = self.store.watch(key)?.ok_or_else(DomainError::not_found)?;
        self.resource(&watch)
    }

    pub fn resource(&self, watch: &Watch) -> InventoryResult<WatchResource> {
        let brand = match watch.brand_id {
            Some(id) => self.store.brand(id)?,
            None => None,
        };
        let batch = match watch.batch_id {
            Some(id) => self.store.batch(id)?,
            None => None,
        };
        let images = self.store.images(watch.id)?;
        debug!(watch_id = %watch.id, images = images.len(), "rendering watch");

        let relations = WatchRelations {
            brand: Some(brand),
            batch: Some(batch),
            images: Some(images),
            ..WatchRelations::default()
        }
        .with_columns(watch);
        Ok(WatchResource::new(watch, relations, self.storage.as_ref()))
    }
}
