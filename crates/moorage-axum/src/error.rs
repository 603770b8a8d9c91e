//! Axum-specific error types and mappings.
//!
//! Every error leaves the API as `{ "ok": false, "error": "<message>" }`
//! with a status derived from the core error kind.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use moorage_core::CoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The server is shutting down.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::ServiceUnavailable(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self.message(), "request failed");
        }
        let body = ErrorBody {
            ok: false,
            error: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::BadRequest(msg),
            CoreError::NotFound(msg) => Self::NotFound(msg),
            other if other.is_not_found() => Self::NotFound(other.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}
