use std::collections::BTreeMap;

use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrdersError {
    #[error("Order not found: {id}")]
    NotFound { id: i64 },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {fields:?}")]
    Validation { fields: BTreeMap<String, String> },

    #[error("Internal error")]
    Internal,
}

impl From<crate::domain::error::DomainError> for OrdersError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            OrderNotFound { id } => Self::NotFound { id },
            e @ VersionConflict { .. } => Self::Conflict {
                message: e.to_string(),
            },
            Validation { errors } => Self::Validation {
                fields: errors.into_map(),
            },
            Query(q) => Self::Validation {
                fields: BTreeMap::from([(q.parameter().to_string(), q.to_string())]),
            },
            Storage { .. } => Self::Internal,
        }
    }
}
