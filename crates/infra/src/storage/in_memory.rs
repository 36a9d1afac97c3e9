use std::collections::HashMap;
use std::sync::RwLock;

use watchstock_inventory::{BlobStorage, StorageError};

use super::join_url;

/// In-memory public disk for tests/dev.
#[derive(Debug)]
pub struct InMemoryBlobStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
    base_url: String,
}

impl InMemoryBlobStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            base_url: base_url.into(),
        }
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.files.read().ok()?.get(path).cloned()
    }

    /// Stored paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = match self.files.read() {
            Ok(files) => files.keys().cloned().collect(),
            Err(_) => return vec![],
        };
        paths.sort();
        paths
    }
}

impl Default for InMemoryBlobStorage {
    fn default() -> Self {
        Self::new("/storage")
    }
}

fn poisoned(path: &str) -> StorageError {
    StorageError::Io {
        path: path.to_string(),
        source: std::io::Error::other("storage lock poisoned"),
    }
}

impl BlobStorage for InMemoryBlobStorage {
    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let files = self.files.read().map_err(|_| poisoned(path))?;
        Ok(files.contains_key(path))
    }

    fn put(&self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        if path.is_empty() {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        let mut files = self.files.write().map_err(|_| poisoned(path))?;
        files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let mut files = self.files.write().map_err(|_| poisoned(path))?;
        files.remove(path);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_exists_delete() {
        let disk = InMemoryBlobStorage::default();

        disk.put("watches/a.jpg", b"jpeg").unwrap();
        assert!(disk.exists("watches/a.jpg").unwrap());
        assert_eq!(disk.contents("watches/a.jpg").as_deref(), Some(&b"jpeg"[..]));
        assert_eq!(disk.url("watches/a.jpg"), "/storage/watches/a.jpg");

        disk.delete("watches/a.jpg").unwrap();
        disk.delete("watches/a.jpg").unwrap();
        assert!(!disk.exists("watches/a.jpg").unwrap());
        assert!(disk.paths().is_empty());
    }
}
