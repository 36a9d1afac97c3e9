//! `watchstock-core` — shared domain building blocks.
//!
//! Typed identifiers, the entity trait and the domain error model. No IO.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BatchId, BrandId, ImageId, UserId, WatchId};
