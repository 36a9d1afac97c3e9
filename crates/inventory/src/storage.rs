//! Blob storage port (the public disk where watch images live).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage path: {0}")]
    InvalidPath(String),

    #[error("storage io error at `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// File storage addressed by relative paths.
pub trait BlobStorage: Send + Sync {
    fn exists(&self, path: &str) -> Result<bool, StorageError>;

    fn put(&self, path: &str, contents: &[u8]) -> Result<(), StorageError>;

    /// Deleting a missing file is not an error.
    fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Publicly reachable URL of `path`.
    fn url(&self, path: &str) -> String;
}

impl<S> BlobStorage for std::sync::Arc<S>
where
    S: BlobStorage + ?Sized,
{
    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        (**self).exists(path)
    }

    fn put(&self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        (**self).put(path, contents)
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        (**self).delete(path)
    }

    fn url(&self, path: &str) -> String {
        (**self).url(path)
    }
}

/// Delete `path` if it exists. Failures are logged and skipped.
///
/// Returns whether a file was removed.
pub fn delete_if_exists(storage: &dyn BlobStorage, path: &str) -> bool {
    if path.is_empty() {
        return false;
    }

    match storage.exists(path) {
        Ok(true) => match storage.delete(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path, error = %e, "failed to delete stored file");
                false
            }
        },
        Ok(false) => false,
        Err(e) => {
            tracing::warn!(path, error = %e, "failed to check stored file");
            false
        }
    }
}
