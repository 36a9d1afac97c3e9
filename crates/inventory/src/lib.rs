//! Watch inventory domain module.
//!
//! Watches move through acquisition, processing and sale. This crate holds the
//! model, the write workflows (upsert, delete, image sync) and the explicit
//! lifecycle hooks they run. Persistence and file storage are reached through
//! the [`store::InventoryStore`] and [`storage::BlobStorage`] traits.

pub mod delete;
pub mod error;
pub mod images;
pub mod model;
pub mod observer;
pub mod request;
pub mod resource;
pub mod sku;
pub mod storage;
pub mod store;
pub mod upsert;
pub mod user;
pub mod values;

pub use delete::DeleteWatch;
pub use error::{InventoryError, InventoryResult, ValidationErrors};
pub use images::{ImageSync, StagedFiles, StoredImageSync};
pub use model::{Batch, Brand, UserSummary, Watch, WatchImage};
pub use observer::WatchObserver;
pub use request::StoreWatchRequest;
pub use resource::{ImageResource, WatchRelations, WatchResource};
pub use sku::{PrefixSkuGenerator, SkuGenerator, SkuScope};
pub use storage::{BlobStorage, StorageError};
pub use store::{InventoryStore, InventoryTx};
pub use upsert::UpdateOrCreateWatch;
pub use user::CurrentUser;
pub use values::{ImageInput, UploadedFile, WatchKey, WatchValues};
