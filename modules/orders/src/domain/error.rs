use query_core::{FieldErrors, QueryError};
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Order not found with id: {id}")]
    OrderNotFound { id: i64 },

    #[error("Order {id} was modified concurrently (expected version {expected}, current {actual})")]
    VersionConflict { id: i64, expected: i64, actual: i64 },

    #[error("Validation failed: {errors}")]
    Validation { errors: FieldErrors },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation { errors }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => Self::OrderNotFound { id },
            StoreError::Conflict {
                id,
                expected,
                actual,
            } => Self::VersionConflict {
                id,
                expected,
                actual,
            },
            e @ StoreError::Duplicate { .. } => Self::Storage {
                message: e.to_string(),
            },
            StoreError::Backend { message } => Self::Storage { message },
        }
    }
}
