//! Application-level error type returned by handlers.
//!
//! All variants serialise to [`ErrorResponse`] and map to an HTTP status.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ldr::{MappingError, ServiceError};
use ldr_api::error::codes;
use ldr_api::ErrorResponse;

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// The requested document could not be loaded or processed.
    Resolution(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, codes::INVALID_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, codes::NOT_FOUND, msg),
            AppError::Resolution(msg) => (StatusCode::BAD_GATEWAY, codes::RESOLUTION_FAILED, msg),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL_ERROR, msg)
            }
        };
        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::JsonLd(e) => AppError::Resolution(e.to_string()),
            ServiceError::Cache(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ldr::CacheError> for AppError {
    fn from(e: ldr::CacheError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<MappingError> for AppError {
    fn from(e: MappingError) -> Self {
        AppError::BadRequest(format!("Failed to load mappings: {e}"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
