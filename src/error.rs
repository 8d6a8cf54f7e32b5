// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::services::weather_service::WeatherError;
use crate::validators::{FieldErrors, ValidationError};

pub const DESTINATION_NOT_FOUND_MESSAGE: &str =
    "Destination code not found in your stored airport codes.";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    ValidationError {
        message: String,
        field_errors: BTreeMap<String, Vec<String>>,
    },
    InvalidJson(String),
    IntegrityError(String),
    DestinationNotFound,

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),
    NoResults(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (upstream weather providers)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. }
            | ApiError::InvalidJson(_)
            | ApiError::IntegrityError(_)
            | ApiError::DestinationNotFound => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::NoResults(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidJson(msg)
            | ApiError::IntegrityError(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::NoResults(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::BadGateway(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::DestinationNotFound => DESTINATION_NOT_FOUND_MESSAGE,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::IntegrityError(_) => "INTEGRITY_ERROR",
            ApiError::DestinationNotFound => "DESTINATION_NOT_FOUND",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::NoResults(_) => "NO_RESULTS",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        });

        if let ApiError::ValidationError { field_errors, .. } = self {
            response["field_errors"] = json!(field_errors);
        }

        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation_error(field_errors: FieldErrors) -> Self {
        ApiError::ValidationError {
            message: "Validation failed".to_string(),
            field_errors: field_errors.into_map(),
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn integrity_error(message: impl Into<String>) -> Self {
        ApiError::IntegrityError(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn no_results(message: impl Into<String>) -> Self {
        ApiError::NoResults(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::validation_error(errors)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::validation_error(FieldErrors::from(error))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        tracing::error!("Credential handling failed: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Integrity(msg) => {
                tracing::debug!("Integrity violation: {}", msg);
                ApiError::integrity_error(
                    "This record conflicts with an existing record or references a missing one.",
                )
            }
            DatabaseError::ConfigMissing(msg) => {
                tracing::error!("Database configuration missing: {}", msg);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("DATABASE_URL is not a valid Postgres URL");
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
            DatabaseError::Migration(migrate_err) => {
                tracing::error!("Migration error: {}", migrate_err);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::NoResults(msg) => ApiError::no_results(msg),
            WeatherError::InvalidInput(validation) => ApiError::from(validation),
            WeatherError::MissingApiKey(provider) => {
                tracing::error!("No API key configured for {}", provider);
                ApiError::service_unavailable("Weather provider is not configured")
            }
            WeatherError::Request(req_err) => {
                tracing::error!("Weather provider request failed: {}", req_err);
                ApiError::bad_gateway("Weather provider request failed")
            }
            WeatherError::Upstream { provider, status } => {
                tracing::error!("{} responded with {}", provider, status);
                ApiError::bad_gateway(format!("{} responded with status {}", provider, status))
            }
            WeatherError::Decode(msg) => {
                tracing::error!("Unexpected weather provider payload: {}", msg);
                ApiError::bad_gateway("Weather provider returned an unexpected response")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_map() {
        let mut errors = FieldErrors::new();
        errors.add("icao_code", "This field is required.");
        let body = ApiError::from(errors).to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["icao_code"][0], "This field is required.");
    }

    #[test]
    fn destination_not_found_is_named() {
        let err = ApiError::DestinationNotFound;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json()["error"], DESTINATION_NOT_FOUND_MESSAGE);
        assert!(err.to_json().get("field_errors").is_none());
    }

    #[test]
    fn integrity_maps_to_bad_request() {
        let err = ApiError::from(DatabaseError::Integrity("duplicate key".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INTEGRITY_ERROR");
    }

    #[test]
    fn storage_failures_hide_details() {
        let err = ApiError::from(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Database error occurred");

        let err = ApiError::from(DatabaseError::ConfigMissing("DATABASE_URL"));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.message().contains("DATABASE_URL"));
    }

    #[test]
    fn no_results_is_404() {
        let err = ApiError::from(WeatherError::NoResults("nothing".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "NO_RESULTS");
    }
}
