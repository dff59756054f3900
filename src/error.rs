/// Unified error types for the Kaarigar360 admin console
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the console
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Document store errors (SQLite backend)
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Store backend reachable but unable to serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Backend cannot order server-side; callers fall back to a local sort
    #[error("Ordered fetch unsupported on {collection}.{field}")]
    OrderUnsupported { collection: String, field: String },

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Request payloads that fail validation (blank reason, bad window, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Lifecycle or dispute precondition violations
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert ConsoleError to HTTP response
impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ConsoleError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "AuthenticationRequired",
                self.to_string(),
            ),
            ConsoleError::InvalidArgument(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                self.to_string(),
            ),
            ConsoleError::InvalidState(_) => (
                StatusCode::CONFLICT,
                "InvalidState",
                self.to_string(),
            ),
            ConsoleError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                self.to_string(),
            ),
            ConsoleError::Store(_) | ConsoleError::Unavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "StoreUnavailable",
                "Document store unavailable".to_string(), // Don't leak details
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "Internal server error".to_string(),
            ),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR || status == StatusCode::SERVICE_UNAVAILABLE
        {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
