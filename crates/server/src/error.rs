//! Errors rendered at the HTTP boundary.
//!
//! Clients only ever see a short fixed message. The underlying cause is
//! logged, never returned.

use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lectern_core::LecternError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required request field is missing or empty.
    #[error("{0} is required")]
    Missing(&'static str),

    /// The article could not be fetched or extracted.
    #[error("Failed to parse article")]
    ArticleFailed(#[source] LecternError),

    /// A handler panicked; rendered like any other failed import.
    #[error("Failed to parse article")]
    Panicked,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Missing(_) => StatusCode::BAD_REQUEST,
            ApiError::ArticleFailed(_) | ApiError::Panicked => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LecternError> for ApiError {
    fn from(err: LecternError) -> Self {
        match err {
            LecternError::MalformedInput(_) => ApiError::Missing("URL"),
            other => ApiError::ArticleFailed(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::ArticleFailed(cause) = &self {
            tracing::error!(error = %cause, kind = ?cause.kind(), "article import failed");
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Response for a panic caught by `CatchPanicLayer`. The payload is logged.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "request handler panicked");
    ApiError::Panicked.into_response()
}
