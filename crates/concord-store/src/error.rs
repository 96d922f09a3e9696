//! Storage error types

use concord_domain::RepositoryError;
use thiserror::Error;

/// Errors that can occur inside the storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        RepositoryError::storage_with_source(message, err)
    }
}
