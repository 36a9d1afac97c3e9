//! Update-or-create workflow for watches.

use std::sync::Arc;

use tracing::info;

use crate::error::InventoryResult;
use crate::images::{ImageSync, StagedFiles};
use crate::model::Watch;
use crate::observer::WatchObserver;
use crate::store::{InventoryStore, InventoryTx};
use crate::values::{WatchKey, WatchValues};

/// Resolves brand/batch names, applies defaults, upserts the watch and syncs
/// its images, all inside one store transaction.
pub struct UpdateOrCreateWatch<S> {
    store: S,
    observer: WatchObserver,
    images: Arc<dyn ImageSync>,
    default_location: Option<String>,
}

impl<S: InventoryStore> UpdateOrCreateWatch<S> {
    pub fn new(store: S, observer: WatchObserver, images: Arc<dyn ImageSync>) -> Self {
        Self {
            store,
            observer,
            images,
            default_location: None,
        }
    }

    /// Location assigned to watches saved without one.
    pub fn with_default_location(mut self, location: impl Into<String>) -> Self {
        self.default_location = Some(location.into());
        self
    }

    /// Superseded image files are deleted only after the transaction commits;
    /// files written for a transaction that rolls back are removed again.
    pub fn execute(&self, key: WatchKey, mut values: WatchValues) -> InventoryResult<Watch> {
        let mut staged = StagedFiles::new();

        let saved = self.store.transaction(|tx| {
            resolve_batch(tx, &mut values)?;
            resolve_brand(tx, &mut values)?;
            self.apply_default_location(&mut values);

            let (watch, created) = self.update_or_create(tx, &key, &values)?;

            if let Some(images) = &values.images {
                self.images.sync(tx, &watch, images, &mut staged)?;
            }

            info!(
                watch_id = %watch.id,
                sku = watch.sku.as_deref().unwrap_or(""),
                created,
                "watch saved"
            );
            Ok(watch)
        });

        self.images.finish(staged, saved.is_ok());
        saved
    }

    fn apply_default_location(&self, values: &mut WatchValues) {
        if values.location.is_none() {
            values.location = self.default_location.clone();
        }
    }

    fn update_or_create(
        &self,
        tx: &mut dyn InventoryTx,
        key: &WatchKey,
        values: &WatchValues,
    ) -> InventoryResult<(Watch, bool)> {
        match tx.find_watch(key)? {
            Some(original) => {
                let mut watch = original.clone();
                values.apply_to(&mut watch);

                let brand = match watch.brand_id {
                    Some(id) => tx.brand(id)?,
                    None => None,
                };
                let persisted_name = brand.as_ref().map(|b| b.name.clone());
                let except = Some(watch.id);
                let taken = |sku: &str| tx.sku_taken(sku, except);

                self.observer.updating(
                    &mut watch,
                    &original,
                    brand.as_ref(),
                    persisted_name.as_deref(),
                    &taken,
                )?;

                tx.update_watch(watch.clone())?;
                Ok((watch, false))
            }
            None => {
                let mut watch = values.build(key);

                let brand = match watch.brand_id {
                    Some(id) => tx.brand(id)?,
                    None => None,
                };
                let taken = |sku: &str| tx.sku_taken(sku, None);

                self.observer.creating(&mut watch, brand.as_ref(), &taken)?;

                tx.insert_watch(watch.clone())?;
                Ok((watch, true))
            }
        }
    }
}

fn resolve_batch(tx: &mut dyn InventoryTx, values: &mut WatchValues) -> InventoryResult<()> {
    if let Some(name) = values.batch.take() {
        let batch = tx.batch_first_or_create(&name)?;
        values.batch_id = Some(batch.id);
    }
    Ok(())
}

fn resolve_brand(tx: &mut dyn InventoryTx, values: &mut WatchValues) -> InventoryResult<()> {
    if let Some(name) = values.brand.take() {
        let brand = tx.brand_first_or_create(&name)?;
        values.brand_id = Some(brand.id);
    }
    Ok(())
}
