//! Store service error types.

use thiserror::Error;

use corner_store_core::ProductValidationError;

use crate::db::RepositoryError;

/// Errors from product, cart, and checkout operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// The referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<ProductValidationError> for StoreError {
    fn from(err: ProductValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
