//! # REST API Errors
//!
//! Failures surfaced by the student facade and its HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::schema::ValidationErrors;
use crate::storage::StoreError;

use super::response::FailureEnvelope;

/// Result type for facade operations
pub type RestResult<T> = Result<T, RestError>;

/// Facade and boundary errors
#[derive(Debug, Error)]
pub enum RestError {
    // ==================
    // Client-correctable
    // ==================
    /// Candidate record violates the schema
    #[error("{0}")]
    ValidationFailed(ValidationErrors),

    /// Request body could not be parsed
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // ==================
    // Store failures
    // ==================
    /// Store unreachable, closed, or the query failed
    #[error("{0}")]
    StoreUnavailable(#[from] StoreError),
}

impl From<ValidationErrors> for RestError {
    fn from(errors: ValidationErrors) -> Self {
        RestError::ValidationFailed(errors)
    }
}

impl RestError {
    /// HTTP status for this error.
    ///
    /// Validation and store failures share 500 on the wire; only an
    /// unparseable body is answered with 400.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RestError::ValidationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller could fix the request and retry
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RestError::ValidationFailed(_) | RestError::InvalidBody(_)
        )
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RestError::ValidationFailed(_) => "STUDENTDB_VALIDATION_FAILED",
            RestError::InvalidBody(_) => "STUDENTDB_INVALID_BODY",
            RestError::StoreUnavailable(e) => e.code(),
        }
    }

    /// Field errors carried by a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            RestError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        Failure::new("Request failed", self).into_response()
    }
}

/// A failed request: the route's failure message plus the underlying error
#[derive(Debug)]
pub struct Failure {
    message: &'static str,
    error: RestError,
}

impl Failure {
    pub fn new(message: &'static str, error: impl Into<RestError>) -> Self {
        Self {
            message,
            error: error.into(),
        }
    }

    /// Returns a closure mapping errors to a `Failure` with `message`
    pub fn with(message: &'static str) -> impl Fn(RestError) -> Failure {
        move |error| Failure::new(message, error)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if self.error.is_client_error() {
            tracing::warn!(code = self.error.code(), error = %self.error, "{}", self.message);
        } else {
            tracing::error!(code = self.error.code(), error = %self.error, "{}", self.message);
        }

        let body = FailureEnvelope::new(self.message, &self.error);
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldError;

    fn validation_error() -> RestError {
        RestError::from(ValidationErrors::new(vec![FieldError::required(
            "age",
            "Age is required",
        )]))
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            validation_error().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RestError::from(StoreError::Closed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RestError::InvalidBody("eof".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(validation_error().is_client_error());
        assert!(!RestError::from(StoreError::Closed).is_client_error());
    }

    #[test]
    fn test_codes() {
        assert_eq!(validation_error().code(), "STUDENTDB_VALIDATION_FAILED");
        assert_eq!(
            RestError::from(StoreError::InvalidId("x".into())).code(),
            "STUDENTDB_STORE_INVALID_ID"
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        assert_eq!(
            validation_error().to_string(),
            "Student validation failed: age: Age is required"
        );
    }
}
