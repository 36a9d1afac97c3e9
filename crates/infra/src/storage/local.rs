use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use watchstock_inventory::{BlobStorage, StorageError};

use super::join_url;

/// Public disk backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path under the root; absolute paths and `..` are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if safe {
            Ok(self.root.join(relative))
        } else {
            Err(StorageError::InvalidPath(path.to_string()))
        }
    }
}

fn io_error(path: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_string(),
        source,
    }
}

impl BlobStorage for LocalDiskStorage {
    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        full.try_exists().map_err(|e| io_error(path, e))
    }

    fn put(&self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
        }
        std::fs::write(&full, contents).map_err(|e| io_error(path, e))
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        match std::fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(path, e)),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}
