use common::storage::StorageError;

use crate::persistence::StoreError;

/// Failure of a catalog operation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The requested alternative name is already taken.
    #[error("alternative name '{0}' is already in use")]
    DuplicateIdentifier(String),
    #[error("comic '{0}' not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("media storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("record store failed: {0}")]
    Persistence(#[from] StoreError),
}
