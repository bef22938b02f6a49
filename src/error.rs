//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::store::StoreError;

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending body field
    pub param: &'static str,
    pub msg: String,
}

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and JSON body.
///
/// # Error Categories
///
/// - **Validation Errors**: One or more request fields failed their checks
/// - **Duplicate / Bad Request**: A uniqueness or reference check failed
/// - **Authentication Errors**: Missing or invalid bearer token
/// - **Authorization Errors**: Role or ownership check failed
/// - **Resource Errors**: Requested resource not found
/// - **Store / Internal Errors**: Anything unexpected
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Returns HTTP 400 with every violation listed.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// A unique value is already taken.
    ///
    /// Returns HTTP 400.
    #[error("{0}")]
    Duplicate(String),

    /// Request is well-formed but refers to something invalid.
    ///
    /// Returns HTTP 400.
    #[error("{0}")]
    BadRequest(String),

    /// Body could not be parsed as the expected JSON.
    ///
    /// Returns HTTP 400.
    #[error("Malformed request body")]
    MalformedBody(#[from] JsonRejection),

    /// Missing, expired or forged bearer token.
    ///
    /// Returns HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed.
    ///
    /// Returns HTTP 403.
    #[error("{0}")]
    Forbidden(String),

    /// Returns HTTP 404. Holds the entity name, e.g. "Blog".
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Persistence failed. Details are logged, never returned.
    ///
    /// Returns HTTP 500.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Hashing or token signing failed.
    ///
    /// Returns HTTP 500.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Duplicate(_)
            | AppError::BadRequest(_)
            | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// Validation failures list every field:
/// ```json
/// { "errors": [ { "param": "email", "msg": "Please include a valid email" } ] }
/// ```
///
/// Everything else carries a single message:
/// ```json
/// { "msg": "Blog not found" }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::MalformedBody(rejection) => json!({ "msg": rejection.body_text() }),
            AppError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                json!({ "msg": "Server error" })
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal failure");
                json!({ "msg": "Server error" })
            }
            other => json!({ "msg": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
