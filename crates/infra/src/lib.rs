//! Infrastructure layer: storage adapters, acting-user providers,
//! configuration and service wiring.

pub mod config;
pub mod current_user;
pub mod services;
pub mod storage;
pub mod store;

pub use config::{AppConfig, Environment};
pub use current_user::{Anonymous, StaticUser};
pub use services::InventoryServices;
pub use storage::{InMemoryBlobStorage, LocalDiskStorage};
pub use store::InMemoryInventoryStore;
