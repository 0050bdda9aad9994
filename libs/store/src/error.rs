use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("entity {id} not found")]
    NotFound { id: i64 },

    #[error("version conflict on entity {id}: expected {expected}, found {actual}")]
    Conflict { id: i64, expected: i64, actual: i64 },

    /// A unique column already holds `value`.
    #[error("duplicate {field}: {value}")]
    Duplicate { field: String, value: String },

    #[error("storage backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}
