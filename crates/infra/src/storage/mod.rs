//! Blob storage adapters for the public disk.

pub mod in_memory;
pub mod local;

pub use in_memory::InMemoryBlobStorage;
pub use local::LocalDiskStorage;

/// Join a base URL and a relative path with exactly one `/` between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
