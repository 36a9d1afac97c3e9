use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use watchstock_core::{BatchId, BrandId, DomainError, Entity, ImageId, WatchId};
use watchstock_inventory::model::sort_images;
use watchstock_inventory::{
    Batch, Brand, InventoryError, InventoryResult, InventoryStore, InventoryTx, Watch, WatchImage,
    WatchKey,
};

type Table<E> = HashMap<<E as Entity>::Id, E>;

fn put<E: Entity>(table: &mut Table<E>, record: E) {
    table.insert(record.id(), record);
}

#[derive(Debug, Clone, Default)]
struct InventoryState {
    brands: Table<Brand>,
    batches: Table<Batch>,
    watches: Table<Watch>,
    images: Table<WatchImage>,
}

impl InventoryState {
    fn sku_taken(&self, sku: &str, except: Option<WatchId>) -> bool {
        self.watches.values().any(|w| {
            !w.is_deleted() && Some(w.id) != except && w.sku.as_deref() == Some(sku)
        })
    }
}

/// In-memory inventory store for tests/dev.
///
/// Transactions run one at a time against a working copy of the state; the
/// copy replaces the committed state only when the closure returns `Ok`.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    state: Mutex<InventoryState>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn snapshot(&self) -> InventoryResult<InventoryState> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|_| InventoryError::store("inventory store lock poisoned"))
    }

    /// All brands, sorted by name.
    pub fn brands(&self) -> InventoryResult<Vec<Brand>> {
        let mut brands: Vec<Brand> = self.snapshot()?.brands.into_values().collect();
        brands.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(brands)
    }

    /// All batches, sorted by name.
    pub fn batches(&self) -> InventoryResult<Vec<Batch>> {
        let mut batches: Vec<Batch> = self.snapshot()?.batches.into_values().collect();
        batches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(batches)
    }

    /// Every watch record, soft-deleted ones included.
    pub fn watches_with_trashed(&self) -> InventoryResult<Vec<Watch>> {
        let mut watches: Vec<Watch> = self.snapshot()?.watches.into_values().collect();
        watches.sort_by_key(|w| w.id);
        Ok(watches)
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn transaction<T, F>(&self, work: F) -> InventoryResult<T>
    where
        F: FnOnce(&mut dyn InventoryTx) -> InventoryResult<T>,
    {
        let mut committed = self
            .state
            .lock()
            .map_err(|_| InventoryError::store("inventory store lock poisoned"))?;

        let mut tx = InMemoryTx {
            state: committed.clone(),
        };
        let out = work(&mut tx)?;

        *committed = tx.state;
        Ok(out)
    }
}

struct InMemoryTx {
    state: InventoryState,
}

impl InventoryTx for InMemoryTx {
    fn brand(&self, id: BrandId) -> InventoryResult<Option<Brand>> {
        Ok(self.state.brands.get(&id).cloned())
    }

    fn brand_first_or_create(&mut self, name: &str) -> InventoryResult<Brand> {
        if let Some(brand) = self.state.brands.values().find(|b| b.name == name) {
            return Ok(brand.clone());
        }
        let brand = Brand::new(name);
        put(&mut self.state.brands, brand.clone());
        Ok(brand)
    }

    fn batch(&self, id: BatchId) -> InventoryResult<Option<Batch>> {
        Ok(self.state.batches.get(&id).cloned())
    }

    fn batch_first_or_create(&mut self, name: &str) -> InventoryResult<Batch> {
        if let Some(batch) = self.state.batches.values().find(|b| b.name == name) {
            return Ok(batch.clone());
        }
        let batch = Batch::new(name);
        put(&mut self.state.batches, batch.clone());
        Ok(batch)
    }

    fn find_watch(&self, key: &WatchKey) -> InventoryResult<Option<Watch>> {
        Ok(self
            .state
            .watches
            .values()
            .find(|w| !w.is_deleted() && key.matches(w))
            .cloned())
    }

    fn sku_taken(&self, sku: &str, except: Option<WatchId>) -> InventoryResult<bool> {
        Ok(self.state.sku_taken(sku, except))
    }

    fn insert_watch(&mut self, watch: Watch) -> InventoryResult<()> {
        if self.state.watches.contains_key(&watch.id) {
            return Err(DomainError::conflict(format!("watch {} already exists", watch.id)).into());
        }
        if let Some(sku) = watch.sku.as_deref() {
            if self.state.sku_taken(sku, None) {
                return Err(DomainError::conflict(format!("sku {sku} already exists")).into());
            }
        }
        put(&mut self.state.watches, watch);
        Ok(())
    }

    fn update_watch(&mut self, watch: Watch) -> InventoryResult<()> {
        if !self.state.watches.contains_key(&watch.id) {
            return Err(DomainError::not_found().into());
        }
        if let Some(sku) = watch.sku.as_deref() {
            if !watch.is_deleted() && self.state.sku_taken(sku, Some(watch.id)) {
                return Err(DomainError::conflict(format!("sku {sku} already exists")).into());
            }
        }
        put(&mut self.state.watches, watch);
        Ok(())
    }

    fn images(&self, watch_id: WatchId) -> InventoryResult<Vec<WatchImage>> {
        let mut images: Vec<WatchImage> = self
            .state
            .images
            .values()
            .filter(|i| i.watch_id == watch_id)
            .cloned()
            .collect();
        sort_images(&mut images);
        Ok(images)
    }

    fn save_image(&mut self, image: WatchImage) -> InventoryResult<()> {
        if !self.state.watches.contains_key(&image.watch_id) {
            return Err(DomainError::invariant("image references unknown watch").into());
        }
        put(&mut self.state.images, image);
        Ok(())
    }

    fn delete_image(&mut self, id: ImageId) -> InventoryResult<()> {
        self.state.images.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committed_work_is_visible() {
        let store = InMemoryInventoryStore::new();

        let brand = store
            .transaction(|tx| tx.brand_first_or_create("Rolex"))
            .unwrap();

        assert_eq!(store.brand(brand.id).unwrap(), Some(brand));
    }

    #[test]
    fn failed_work_is_rolled_back() {
        let store = InMemoryInventoryStore::new();

        let result: InventoryResult<()> = store.transaction(|tx| {
            tx.brand_first_or_create("Rolex")?;
            tx.batch_first_or_create("2024-Q1")?;
            Err(InventoryError::store("boom"))
        });

        assert!(result.is_err());
        assert!(store.brands().unwrap().is_empty());
        assert!(store.batches().unwrap().is_empty());
    }

    #[test]
    fn first_or_create_reuses_by_name() {
        let store = InMemoryInventoryStore::new();

        let (a, b) = store
            .transaction(|tx| {
                let a = tx.brand_first_or_create("Omega")?;
                let b = tx.brand_first_or_create("Omega")?;
                Ok((a, b))
            })
            .unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(store.brands().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_live_sku_conflicts_but_trashed_does_not() {
        let store = InMemoryInventoryStore::new();
        let mut first = Watch::new(WatchId::new(), "Daytona");
        first.sku = Some("ROL-DAYT-0001".into());
        store.transaction(|tx| tx.insert_watch(first.clone())).unwrap();

        let mut second = Watch::new(WatchId::new(), "Daytona");
        second.sku = Some("ROL-DAYT-0001".into());
        let err = store
            .transaction(|tx| tx.insert_watch(second.clone()))
            .unwrap_err();
        assert!(matches!(err, InventoryError::Domain(DomainError::Conflict(_))));

        first.deleted_at = Some(chrono::Utc::now());
        store.transaction(|tx| tx.update_watch(first.clone())).unwrap();
        store.transaction(|tx| tx.insert_watch(second.clone())).unwrap();

        let found = store.watch(&WatchKey::Sku("ROL-DAYT-0001".into())).unwrap();
        assert_eq!(found.map(|w| w.id), Some(second.id));
        assert_eq!(store.watches_with_trashed().unwrap().len(), 2);
    }

    #[test]
    fn images_are_listed_in_order() {
        let store = InMemoryInventoryStore::new();
        let watch = Watch::new(WatchId::new(), "Nautilus");
        let image = |order_index| WatchImage {
            id: ImageId::new(),
            watch_id: watch.id,
            path: format!("watches/{order_index}.jpg"),
            order_index,
            use_for_ai: false,
        };

        store
            .transaction(|tx| {
                tx.insert_watch(watch.clone())?;
                tx.save_image(image(2))?;
                tx.save_image(image(0))?;
                tx.save_image(image(1))
            })
            .unwrap();

        let order: Vec<u32> = store
            .images(watch.id)
            .unwrap()
            .iter()
            .map(|i| i.order_index)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn image_for_unknown_watch_is_rejected() {
        let store = InMemoryInventoryStore::new();
        let orphan = WatchImage {
            id: ImageId::new(),
            watch_id: WatchId::new(),
            path: "watches/orphan.jpg".into(),
            order_index: 0,
            use_for_ai: false,
        };

        assert!(store.transaction(|tx| tx.save_image(orphan.clone())).is_err());
    }
}
