//! Error types and HTTP error response handling.
//!
//! This module defines all server-side errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur while serving the
/// integrations API. Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from store operations
/// - **Resource Errors**: Requested integration not found
/// - **Validation Errors**: Invalid request data or credential payloads
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Store operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested integration does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Integration not found")]
    IntegrationNotFound,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The credential blob does not match the shape its provider requires.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
}

impl From<crate::models::credentials::CredentialError> for AppError {
    fn from(err: crate::models::credentials::CredentialError) -> Self {
        AppError::InvalidCredentials(err.to_string())
    }
}

/// An id segment that does not parse cannot name a stored integration.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => AppError::IntegrationNotFound,
            other => AppError::InvalidRequest(other.body_text()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `IntegrationNotFound` → 404 Not Found
/// - `InvalidRequest` → 400 Bad Request
/// - `InvalidCredentials` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::IntegrationNotFound => (
                StatusCode::NOT_FOUND,
                "integration_not_found",
                self.to_string(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::InvalidCredentials(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_credentials", msg.clone())
            }
            AppError::Database(ref err) => {
                tracing::error!(error = %err, "integration store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
