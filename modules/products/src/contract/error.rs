use std::collections::BTreeMap;

use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductsError {
    #[error("Product not found: {key}")]
    NotFound { key: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {fields:?}")]
    Validation { fields: BTreeMap<String, String> },

    #[error("Internal error")]
    Internal,
}

impl ProductsError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(fields: BTreeMap<String, String>) -> Self {
        Self::Validation { fields }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for ProductsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            ProductNotFound { id } => Self::not_found(id.to_string()),
            SkuNotFound { sku } => Self::not_found(sku),
            SkuAlreadyExists { sku } => {
                Self::conflict(format!("Product with SKU {sku} already exists"))
            }
            e @ VersionConflict { .. } => Self::conflict(e.to_string()),
            Validation { errors } => Self::validation(errors.into_map()),
            Query(q) => {
                let mut fields = BTreeMap::new();
                fields.insert(q.parameter().to_string(), q.to_string());
                Self::validation(fields)
            }
            Storage { .. } => Self::internal(),
        }
    }
}
