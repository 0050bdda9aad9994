use query_core::{FieldErrors, QueryError};
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found with id: {id}")]
    UserNotFound { id: i64 },

    #[error("User not found with email: {email}")]
    EmailNotFound { email: String },

    #[error("Username {username} is already taken")]
    UsernameAlreadyExists { username: String },

    #[error("User with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error("User {id} was modified concurrently (expected version {expected}, current {actual})")]
    VersionConflict { id: i64, expected: i64, actual: i64 },

    #[error("Validation failed: {errors}")]
    Validation { errors: FieldErrors },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn user_not_found(id: i64) -> Self {
        Self::UserNotFound { id }
    }

    pub fn email_not_found(email: impl Into<String>) -> Self {
        Self::EmailNotFound {
            email: email.into(),
        }
    }

    pub fn username_already_exists(username: impl Into<String>) -> Self {
        Self::UsernameAlreadyExists {
            username: username.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation { errors }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => Self::user_not_found(id),
            StoreError::Conflict {
                id,
                expected,
                actual,
            } => Self::VersionConflict {
                id,
                expected,
                actual,
            },
            StoreError::Duplicate { field, value } if field == "username" => {
                Self::username_already_exists(value)
            }
            StoreError::Duplicate { value, .. } => Self::email_already_exists(value),
            StoreError::Backend { message } => Self::Storage { message },
        }
    }
}
