use thiserror::Error;

/// Errors raised while turning request criteria into a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unsupported sort field '{field}'")]
    InvalidSortField { field: String },

    #[error("invalid pagination: page={page}, size={size} (page must be >= 0, size >= 1)")]
    InvalidPagination { page: i64, size: i64 },
}

impl QueryError {
    pub fn invalid_sort_field(field: impl Into<String>) -> Self {
        Self::InvalidSortField {
            field: field.into(),
        }
    }

    /// Name of the request parameter that caused the error.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidSortField { .. } => "sortBy",
            Self::InvalidPagination { page, .. } if *page < 0 => "page",
            Self::InvalidPagination { .. } => "size",
        }
    }
}
