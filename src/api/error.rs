//! API error types and helpers.
//!
//! # Purpose
//! Centralizes HTTP error response construction so every endpoint returns
//! the same shapes: a stable `code`, a human-readable `message`, and for
//! validation failures an optional per-field map.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
//! - Authentication failures use one generic message regardless of cause,
//!   so callers cannot probe which emails exist.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::collections::BTreeMap;

/// Structured API error returned by handlers.
///
/// Couples an HTTP status code with a JSON error body; `status` must match
/// the semantics of `body.code`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "validation_error".to_string(),
            message: message.to_string(),
            fields: None,
        },
    }
}

/// Build a 400 Bad Request with per-field messages.
pub fn api_validation_fields(fields: BTreeMap<String, String>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "validation_error".to_string(),
            message: "invalid input".to_string(),
            fields: Some(fields),
        },
    }
}

/// Build a 401 Unauthorized error.
pub fn api_unauthorized(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::UNAUTHORIZED,
        body: ErrorResponse {
            code: "unauthorized".to_string(),
            message: message.to_string(),
            fields: None,
        },
    }
}

/// Build a 403 Forbidden error.
pub fn api_forbidden(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::FORBIDDEN,
        body: ErrorResponse {
            code: "forbidden".to_string(),
            message: message.to_string(),
            fields: None,
        },
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        body: ErrorResponse {
            code: "not_found".to_string(),
            message: message.to_string(),
            fields: None,
        },
    }
}

/// Build a 500 Internal Server Error from a store error.
///
/// Logs the store error server-side and returns a generic message.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "authgate storage error");
    api_internal_message(message)
}

/// Build a 500 Internal Server Error without a store error.
pub fn api_internal_message(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorResponse {
            code: "internal".to_string(),
            message: message.to_string(),
            fields: None,
        },
    }
}
