//! Watch lifecycle hooks.
//!
//! Called explicitly by the write workflows right before a watch is inserted,
//! updated or deleted, inside the same transaction.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::error::InventoryResult;
use crate::model::{Brand, Watch};
use crate::sku::{SkuGenerator, SkuScope};
use crate::storage::{BlobStorage, delete_if_exists};
use crate::store::InventoryTx;
use crate::user::CurrentUser;

#[derive(Clone)]
pub struct WatchObserver {
    current_user: Arc<dyn CurrentUser>,
    storage: Arc<dyn BlobStorage>,
    skus: Arc<dyn SkuGenerator>,
}

impl WatchObserver {
    pub fn new(
        current_user: Arc<dyn CurrentUser>,
        storage: Arc<dyn BlobStorage>,
        skus: Arc<dyn SkuGenerator>,
    ) -> Self {
        Self {
            current_user,
            storage,
            skus,
        }
    }

    pub fn current_user(&self) -> &dyn CurrentUser {
        self.current_user.as_ref()
    }

    pub fn storage(&self) -> &dyn BlobStorage {
        self.storage.as_ref()
    }

    /// Before insert: owner, purchase date and SKU defaults.
    ///
    /// `brand` is the brand referenced by `watch.brand_id`, if any.
    pub fn creating(
        &self,
        watch: &mut Watch,
        brand: Option<&Brand>,
        taken: &dyn Fn(&str) -> InventoryResult<bool>,
    ) -> InventoryResult<()> {
        if watch.user_id.is_none() {
            watch.user_id = self.current_user.id();
        }

        if watch.cost_purchase_date.is_none() {
            watch.cost_purchase_date = Some(Utc::now().date_naive());
        }

        let sku_missing = watch.sku.as_deref().is_none_or(str::is_empty);
        if let Some(brand) = brand.filter(|_| sku_missing && !watch.name.is_empty()) {
            let sku = self.skus.generate(SkuScope::Watch, &brand.name, &watch.name, taken)?;
            debug!(watch_id = %watch.id, sku = %sku, "generated sku");
            watch.sku = Some(sku);
        }

        Ok(())
    }

    /// Before update: editor stamp and SKU regeneration.
    ///
    /// `original` is the persisted state. `brand` is the loaded brand relation
    /// (possibly with unsaved changes) and `persisted_brand_name` the stored
    /// name of that same brand. A rename only counts while `brand_id` itself is
    /// unchanged.
    pub fn updating(
        &self,
        watch: &mut Watch,
        original: &Watch,
        brand: Option<&Brand>,
        persisted_brand_name: Option<&str>,
        taken: &dyn Fn(&str) -> InventoryResult<bool>,
    ) -> InventoryResult<()> {
        if let Some(user) = self.current_user.id() {
            watch.updated_by = Some(user);
        }

        let name_changed = watch.name != original.name;
        let brand_changed = watch.brand_id != original.brand_id;
        let brand_renamed = !brand_changed
            && match (brand, persisted_brand_name) {
                (Some(brand), Some(persisted)) => brand.name != persisted,
                _ => false,
            };

        if name_changed || brand_changed || brand_renamed {
            let brand_name = brand.map(|b| b.name.as_str()).unwrap_or("");
            let sku = self.skus.generate(SkuScope::Watch, brand_name, &watch.name, taken)?;
            debug!(
                watch_id = %watch.id,
                sku = %sku,
                name_changed,
                brand_changed,
                brand_renamed,
                "regenerated sku"
            );
            watch.sku = Some(sku);
        }

        Ok(())
    }

    /// Before delete: remove every image file (best effort) and image record.
    ///
    /// Returns the number of image records removed.
    pub fn deleting(&self, tx: &mut dyn InventoryTx, watch: &Watch) -> InventoryResult<usize> {
        let images = tx.images(watch.id)?;
        let count = images.len();

        for image in images {
            delete_if_exists(self.storage.as_ref(), &image.path);
            tx.delete_image(image.id)?;
        }

        if count > 0 {
            debug!(watch_id = %watch.id, images = count, "deleted watch images");
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sku::PrefixSkuGenerator;
    use crate::storage::StorageError;
    use watchstock_core::{BrandId, UserId, WatchId};

    struct FixedUser(Option<UserId>);

    impl CurrentUser for FixedUser {
        fn id(&self) -> Option<UserId> {
            self.0
        }
    }

    struct NoStorage;

    impl BlobStorage for NoStorage {
        fn exists(&self, _path: &str) -> Result<bool, StorageError> {
            Ok(false)
        }

        fn put(&self, _path: &str, _contents: &[u8]) -> Result<(), StorageError> {
            Ok(())
        }

        fn delete(&self, _path: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn url(&self, path: &str) -> String {
            format!("/storage/{path}")
        }
    }

    fn observer(user: Option<UserId>) -> WatchObserver {
        WatchObserver::new(
            Arc::new(FixedUser(user)),
            Arc::new(NoStorage),
            Arc::new(PrefixSkuGenerator::new()),
        )
    }

    fn free(_: &str) -> InventoryResult<bool> {
        Ok(false)
    }

    fn branded(name: &str, brand: &Brand) -> Watch {
        let mut watch = Watch::new(WatchId::new(), name);
        watch.brand_id = Some(brand.id);
        watch
    }

    #[test]
    fn creating_sets_owner_purchase_date_and_sku() {
        let user = UserId::new();
        let brand = Brand::new("Rolex");
        let mut watch = branded("Submariner", &brand);

        observer(Some(user)).creating(&mut watch, Some(&brand), &free).unwrap();

        assert_eq!(watch.user_id, Some(user));
        assert_eq!(watch.cost_purchase_date, Some(Utc::now().date_naive()));
        assert_eq!(watch.sku.as_deref(), Some("ROL-SUBM-0001"));
    }

    #[test]
    fn creating_keeps_explicit_values() {
        let owner = UserId::new();
        let brand = Brand::new("Rolex");
        let mut watch = branded("Submariner", &brand);
        watch.user_id = Some(owner);
        watch.sku = Some("CUSTOM-1".into());

        observer(Some(UserId::new())).creating(&mut watch, Some(&brand), &free).unwrap();

        assert_eq!(watch.user_id, Some(owner));
        assert_eq!(watch.sku.as_deref(), Some("CUSTOM-1"));
    }

    #[test]
    fn creating_without_brand_or_user_leaves_sku_and_owner_unset() {
        let mut watch = Watch::new(WatchId::new(), "Unbranded");

        observer(None).creating(&mut watch, None, &free).unwrap();

        assert!(watch.sku.is_none());
        assert!(watch.user_id.is_none());
    }

    #[test]
    fn updating_stamps_editor_and_regenerates_on_name_change() {
        let editor = UserId::new();
        let brand = Brand::new("Omega");
        let mut original = branded("Seamaster", &brand);
        original.sku = Some("OME-SEAM-0001".into());

        let mut watch = original.clone();
        watch.name = "Speedmaster".into();

        observer(Some(editor))
            .updating(&mut watch, &original, Some(&brand), Some("Omega"), &free)
            .unwrap();

        assert_eq!(watch.updated_by, Some(editor));
        assert_eq!(watch.sku.as_deref(), Some("OME-SPEE-0001"));
    }

    #[test]
    fn updating_without_relevant_change_keeps_sku() {
        let brand = Brand::new("Omega");
        let mut original = branded("Seamaster", &brand);
        original.sku = Some("OME-SEAM-0001".into());

        let mut watch = original.clone();
        watch.notes = Some("serviced".into());

        observer(None)
            .updating(&mut watch, &original, Some(&brand), Some("Omega"), &free)
            .unwrap();

        assert_eq!(watch.sku.as_deref(), Some("OME-SEAM-0001"));
        assert!(watch.updated_by.is_none());
    }

    #[test]
    fn updating_regenerates_on_brand_change() {
        let old_brand = Brand::new("Tudor");
        let new_brand = Brand::new("Rolex");
        let mut original = branded("Black Bay", &old_brand);
        original.sku = Some("TUD-BLAC-0001".into());

        let mut watch = original.clone();
        watch.brand_id = Some(new_brand.id);

        observer(None)
            .updating(&mut watch, &original, Some(&new_brand), Some("Rolex"), &free)
            .unwrap();

        assert_eq!(watch.sku.as_deref(), Some("ROL-BLAC-0001"));
    }

    #[test]
    fn updating_regenerates_when_loaded_brand_was_renamed() {
        let mut brand = Brand::new("Tudor");
        let mut original = branded("Pelagos", &brand);
        original.sku = Some("TUD-PELA-0001".into());
        brand.name = "Heuer".into();

        let mut watch = original.clone();
        observer(None)
            .updating(&mut watch, &original, Some(&brand), Some("Tudor"), &free)
            .unwrap();

        assert_eq!(watch.sku.as_deref(), Some("HEU-PELA-0001"));
    }

    #[test]
    fn updating_ignores_rename_when_brand_not_loaded() {
        let brand_id = BrandId::new();
        let mut original = Watch::new(WatchId::new(), "Pelagos");
        original.brand_id = Some(brand_id);
        original.sku = Some("TUD-PELA-0001".into());

        let mut watch = original.clone();
        observer(None)
            .updating(&mut watch, &original, None, Some("Tudor"), &free)
            .unwrap();

        assert_eq!(watch.sku.as_deref(), Some("TUD-PELA-0001"));
    }
}
