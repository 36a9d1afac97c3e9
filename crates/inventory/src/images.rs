//! Watch image synchronisation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use watchstock_core::{DomainError, ImageId};

use crate::error::InventoryResult;
use crate::model::{Watch, WatchImage};
use crate::storage::{BlobStorage, delete_if_exists};
use crate::store::InventoryTx;
use crate::values::{ImageInput, UploadedFile};

/// File changes made by a sync, settled once the transaction outcome is known.
///
/// `written` files are new and belong to no committed record yet.
/// `superseded` files are still referenced by the committed state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StagedFiles {
    written: Vec<String>,
    superseded: Vec<String>,
}

impl StagedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> &[String] {
        &self.written
    }

    pub fn superseded(&self) -> &[String] {
        &self.superseded
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.superseded.is_empty()
    }

    /// The transaction committed: drop files no record points at anymore.
    pub fn commit(self, storage: &dyn BlobStorage) -> usize {
        settle(storage, &self.superseded)
    }

    /// The transaction rolled back: drop files written for it.
    pub fn discard(self, storage: &dyn BlobStorage) -> usize {
        settle(storage, &self.written)
    }
}

fn settle(storage: &dyn BlobStorage, paths: &[String]) -> usize {
    paths
        .iter()
        .filter(|path| delete_if_exists(storage, path))
        .count()
}

/// Brings a watch's stored images in line with a desired list.
///
/// Implementations write new files straight away but never delete a file the
/// committed state may still reference; those go to `staged` instead.
pub trait ImageSync: Send + Sync {
    fn sync(
        &self,
        tx: &mut dyn InventoryTx,
        watch: &Watch,
        images: &[ImageInput],
        staged: &mut StagedFiles,
    ) -> InventoryResult<()>;

    /// Settle `staged` after the transaction either committed or rolled back.
    fn finish(&self, staged: StagedFiles, committed: bool);
}

/// [`ImageSync`] writing uploads to a [`BlobStorage`] under `watches/<watch_id>/`.
///
/// Every upload gets a fresh file name, so a replacement never overwrites the
/// file of the record it replaces.
#[derive(Clone)]
pub struct StoredImageSync {
    storage: Arc<dyn BlobStorage>,
}

impl StoredImageSync {
    pub fn new(storage: Arc<dyn BlobStorage>) -> Self {
        Self { storage }
    }

    fn store_file(
        &self,
        watch: &Watch,
        file: &UploadedFile,
        staged: &mut StagedFiles,
    ) -> InventoryResult<String> {
        let stem = ImageId::new();
        let path = match file.extension() {
            Some(ext) => format!("watches/{}/{}.{}", watch.id, stem, ext),
            None => format!("watches/{}/{}", watch.id, stem),
        };
        self.storage.put(&path, &file.bytes)?;
        staged.written.push(path.clone());
        Ok(path)
    }
}

impl ImageSync for StoredImageSync {
    fn sync(
        &self,
        tx: &mut dyn InventoryTx,
        watch: &Watch,
        images: &[ImageInput],
        staged: &mut StagedFiles,
    ) -> InventoryResult<()> {
        let existing = tx.images(watch.id)?;
        let mut kept: HashSet<ImageId> = HashSet::new();

        for (position, input) in images.iter().enumerate() {
            let order_index = u32::try_from(position)
                .map_err(|_| DomainError::validation("too many images"))?;

            let current = input
                .id
                .and_then(|id| existing.iter().find(|image| image.id == id));

            let image = match (current, &input.file) {
                (Some(current), None) => WatchImage {
                    order_index,
                    use_for_ai: input.use_for_ai,
                    ..current.clone()
                },
                (Some(current), Some(file)) => {
                    let path = self.store_file(watch, file, staged)?;
                    staged.superseded.push(current.path.clone());
                    WatchImage {
                        path,
                        order_index,
                        use_for_ai: input.use_for_ai,
                        ..current.clone()
                    }
                }
                (None, Some(file)) => WatchImage {
                    id: ImageId::new(),
                    watch_id: watch.id,
                    path: self.store_file(watch, file, staged)?,
                    order_index,
                    use_for_ai: input.use_for_ai,
                },
                // Unknown id without a file: nothing to attach.
                (None, None) => continue,
            };

            kept.insert(image.id);
            tx.save_image(image)?;
        }

        let mut removed = 0usize;
        for image in existing.into_iter().filter(|image| !kept.contains(&image.id)) {
            tx.delete_image(image.id)?;
            staged.superseded.push(image.path);
            removed += 1;
        }

        debug!(
            watch_id = %watch.id,
            kept = kept.len(),
            removed,
            written = staged.written.len(),
            "synced watch images"
        );
        Ok(())
    }

    fn finish(&self, staged: StagedFiles, committed: bool) {
        if staged.is_empty() {
            return;
        }
        let deleted = if committed {
            staged.commit(self.storage.as_ref())
        } else {
            staged.discard(self.storage.as_ref())
        };
        debug!(committed, deleted, "settled staged image files");
    }
}
