use axum::http::StatusCode;
use query_core::{FieldErrors, QueryError};
use svckit::api::problem::{from_parts, ProblemResponse};

use crate::domain::error::DomainError;

pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::OrderNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "ORDERS_NOT_FOUND",
            "Order not found",
            e.to_string(),
            instance,
        ),
        DomainError::VersionConflict { .. } => from_parts(
            StatusCode::CONFLICT,
            "ORDERS_VERSION_CONFLICT",
            "Concurrent modification",
            e.to_string(),
            instance,
        ),
        DomainError::Validation { errors } => ProblemResponse(
            from_parts(
                StatusCode::BAD_REQUEST,
                "ORDERS_VALIDATION",
                "Validation error",
                "Validation failed",
                instance,
            )
            .0
            .with_field_errors(errors),
        ),
        DomainError::Query(q) => {
            let code = match q {
                QueryError::InvalidSortField { .. } => "ORDERS_INVALID_SORT_FIELD",
                QueryError::InvalidPagination { .. } => "ORDERS_INVALID_PAGINATION",
            };
            ProblemResponse(
                from_parts(StatusCode::BAD_REQUEST, code, "Invalid query", q.to_string(), instance)
                    .0
                    .with_field_errors(&FieldErrors::single(q.parameter(), q.to_string())),
            )
        }
        DomainError::Storage { .. } => {
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
