//! Inventory error model.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use watchstock_core::DomainError;

use crate::storage::StorageError;

pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// No authenticated user where one is required.
    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Persistence backend failure.
    #[error("store error: {0}")]
    Store(String),
}

impl InventoryError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// HTTP status a host application should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            InventoryError::Domain(DomainError::NotFound) => 404,
            InventoryError::Domain(DomainError::Conflict(_)) => 409,
            InventoryError::Domain(_) | InventoryError::Validation(_) => 422,
            InventoryError::Unauthorized => 403,
            InventoryError::Storage(_) | InventoryError::Store(_) => 500,
        }
    }
}

impl From<ValidationErrors> for InventoryError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Field-keyed validation messages (`"images.3.file" => [...]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when no message was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}
