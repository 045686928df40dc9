//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the SalonSync API.
//! It maps domain-specific errors to appropriate HTTP status codes and JSON
//! error responses, ensuring a consistent error handling experience across
//! the entire API.
//!
//! Every error body carries a `retryable` flag. It is only true for
//! `503 Service Unavailable`, which also sets a `Retry-After` header so
//! clients can keep showing their previous results and try again.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use salonsync_core::errors::TimeError;
use serde_json::json;
use tracing::error;

/// Seconds a client should wait before retrying a 503
pub const RETRY_AFTER_SECONDS: u64 = 5;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `TimeError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use salonsync_api::middleware::error_handling::AppError;
/// use salonsync_core::errors::TimeError;
///
/// async fn handler(duration: i64) -> Result<Json<i64>, AppError> {
///     if duration < 0 {
///         return Err(AppError(TimeError::Validation("negative duration".to_string())));
///     }
///     Ok(Json(duration))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TimeError);

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            TimeError::NotFound(_) => StatusCode::NOT_FOUND,
            TimeError::Validation(_) => StatusCode::BAD_REQUEST,
            TimeError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TimeError::Authorization(_) => StatusCode::FORBIDDEN,
            TimeError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TimeError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TimeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let retryable = self.0.is_retryable();
        let body = Json(json!({ "error": self.0.to_string(), "retryable": retryable }));

        if retryable {
            (
                status,
                [(header::RETRY_AFTER, RETRY_AFTER_SECONDS.to_string())],
                body,
            )
                .into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// Automatic conversion from TimeError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, TimeError>` in handler functions that return `Result<T, AppError>`.
impl From<TimeError> for AppError {
    fn from(err: TimeError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// It wraps the eyre error in a TimeError::Database variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TimeError::Database(err))
    }
}

/// Maps a TimeError to an HTTP response
pub fn map_error(err: TimeError) -> Response {
    AppError(err).into_response()
}
