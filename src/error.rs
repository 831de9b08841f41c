//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! represent the failure modes the API exposes: validation problems, missing
//! credentials, duplicate usernames, missing records, and internal faults.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handler results
//! convert into HTTP responses with JSON bodies of the form
//! `{"error": "<message>"}`. Internal faults are the exception: their detail
//! is logged server-side and the client receives a generic message only.
//!
//! `From` implementations for `store::StoreError`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`, and
//! `bcrypt::BcryptError` keep the `?` operator ergonomic in handlers.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a specific type of error, carrying a message
/// detailing the issue. These errors are then converted into appropriate HTTP
/// responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication is missing, expired, or failed (HTTP 401).
    Unauthorized(String),
    /// The request is malformed or fails input validation (HTTP 400).
    BadRequest(String),
    /// A requested resource does not exist (HTTP 404).
    NotFound(String),
    /// The request conflicts with existing state, e.g. a taken username
    /// (HTTP 409).
    Conflict(String),
    /// Failed validation of a request body (HTTP 400).
    ValidationError(String),
    /// An unexpected server-side error (HTTP 500). The message is logged but
    /// never sent to the client.
    InternalServerError(String),
    /// An error raised by the storage backend (HTTP 500). The message is
    /// logged but never sent to the client.
    StorageError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::StorageError(msg) => write!(f, "Storage Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation lets actix-web translate `AppError` results from
/// handlers into the correct HTTP status codes and JSON error bodies.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            // Internal detail stays in the server log; clients get a generic
            // message.
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal Server Error"
                }))
            }
            AppError::StorageError(msg) => {
                log::error!("storage error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal Server Error"
                }))
            }
        }
    }
}

/// Converts `StoreError` into `AppError`.
///
/// A violated username constraint becomes `Conflict`; everything else is a
/// storage fault surfaced as a generic 500.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::UsernameTaken(_) => AppError::Conflict("Username already exists".into()),
            other => AppError::StorageError(other.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
///
/// This is typically used when token verification fails.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// This handles errors during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        // Test Unauthorized
        let error = AppError::Unauthorized("Invalid token".into());
        let response = error.error_response();
        assert_eq!(response.status(), 401);

        // Test BadRequest
        let error = AppError::BadRequest("Invalid input".into());
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        // Validation failures surface as 400, not 422
        let error = AppError::ValidationError("title must not be blank".into());
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        // Test NotFound
        let error = AppError::NotFound("Resource not found".into());
        let response = error.error_response();
        assert_eq!(response.status(), 404);

        // Test Conflict
        let error = AppError::Conflict("Username already exists".into());
        let response = error.error_response();
        assert_eq!(response.status(), 409);

        // Test InternalServerError
        let error = AppError::InternalServerError("Server error".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_store_error_conversion() {
        let conflict: AppError = StoreError::UsernameTaken("alice".into()).into();
        assert!(matches!(conflict, AppError::Conflict(_)));
        assert_eq!(conflict.error_response().status(), 409);
    }
}
