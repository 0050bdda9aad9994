use query_core::FieldErrors;
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Object not found with id: {id}")]
    ObjectNotFound { id: i64 },

    #[error("Object {id} was modified concurrently (expected version {expected}, current {actual})")]
    VersionConflict { id: i64, expected: i64, actual: i64 },

    #[error("Validation failed: {errors}")]
    Validation { errors: FieldErrors },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => Self::ObjectNotFound { id },
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
