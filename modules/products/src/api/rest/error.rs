use axum::http::StatusCode;
use query_core::{FieldErrors, QueryError};
use svckit::api::problem::{from_parts, ProblemResponse};

use crate::domain::error::DomainError;

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::ProductNotFound { .. } | DomainError::SkuNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "PRODUCTS_NOT_FOUND",
            "Product not found",
            e.to_string(),
            instance,
        ),
        DomainError::SkuAlreadyExists { .. } => from_parts(
            StatusCode::CONFLICT,
            "PRODUCTS_SKU_CONFLICT",
            "SKU already exists",
            e.to_string(),
            instance,
        ),
        DomainError::VersionConflict { .. } => from_parts(
            StatusCode::CONFLICT,
            "PRODUCTS_VERSION_CONFLICT",
            "Concurrent modification",
            e.to_string(),
            instance,
        ),
        DomainError::Validation { errors } => ProblemResponse(
            from_parts(
                StatusCode::BAD_REQUEST,
                "PRODUCTS_VALIDATION",
                "Validation error",
                "Validation failed",
                instance,
            )
            .0
            .with_field_errors(errors),
        ),
        DomainError::Query(q) => {
            let code = match q {
                QueryError::InvalidSortField { .. } => "PRODUCTS_INVALID_SORT_FIELD",
                QueryError::InvalidPagination { .. } => "PRODUCTS_INVALID_PAGINATION",
            };
            ProblemResponse(
                from_parts(StatusCode::BAD_REQUEST, code, "Invalid query", q.to_string(), instance)
                    .0
                    .with_field_errors(&FieldErrors::single(q.parameter(), q.to_string())),
            )
        }
        DomainError::Storage { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_STORAGE",
                "Internal error",
                "An internal storage error occurred",
                instance,
            )
        }
    }
}
