//! Storage error types for the item store backends.

use thiserror::Error;

/// Storage operation errors.
///
/// The `Display` text is what callers see in a 500 response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {entity_id}")]
    NotFound {
        entity_type: String,
        entity_id: String,
    },
    /// Database connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
    /// General storage error
    #[error("Storage error: {0}")]
    Other(String),
}

impl StorageError {
    pub fn item_not_found(id: impl Into<String>) -> Self {
        StorageError::NotFound {
            entity_type: "item".to_string(),
            entity_id: id.into(),
        }
    }
}
