use axum::http::StatusCode;
use svckit::api::problem::{from_parts, ProblemResponse};

use crate::domain::error::DomainError;

pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::ObjectNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "API_OBJECTS_NOT_FOUND",
            "Object not found",
            e.to_string(),
            instance,
        ),
        DomainError::VersionConflict { .. } => from_parts(
            StatusCode::CONFLICT,
            "API_OBJECTS_VERSION_CONFLICT",
            "Concurrent modification",
            e.to_string(),
            instance,
        ),
        DomainError::Validation { errors } => ProblemResponse(
            from_parts(
                StatusCode::BAD_REQUEST,
                "API_OBJECTS_VALIDATION",
                "Validation error",
                "Validation failed",
                instance,
            )
            .0
            .with_field_errors(errors),
        ),
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
