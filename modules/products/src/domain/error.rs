use query_core::{FieldErrors, QueryError};
use store::StoreError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Product not found with id: {id}")]
    ProductNotFound { id: i64 },

    #[error("Product not found with SKU: {sku}")]
    SkuNotFound { sku: String },

    #[error("Product with SKU {sku} already exists")]
    SkuAlreadyExists { sku: String },

    #[error("Product {id} was modified concurrently (expected version {expected}, current {actual})")]
    VersionConflict { id: i64, expected: i64, actual: i64 },

    #[error("Validation failed: {errors}")]
    Validation { errors: FieldErrors },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn product_not_found(id: i64) -> Self {
        Self::ProductNotFound { id }
    }

    pub fn sku_not_found(sku: impl Into<String>) -> Self {
        Self::SkuNotFound { sku: sku.into() }
    }

    pub fn sku_already_exists(sku: impl Into<String>) -> Self {
        Self::SkuAlreadyExists { sku: sku.into() }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation { errors }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => Self::product_not_found(id),
            StoreError::Conflict {
                id,
                expected,
                actual,
            } => Self::VersionConflict {
                id,
                expected,
                actual,
            },
            StoreError::Duplicate { value, .. } => Self::sku_already_exists(value),
            StoreError::Backend { message } => Self::storage(message),
        }
    }
}
