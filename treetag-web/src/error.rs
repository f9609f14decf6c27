//! API error type for the web service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Shared library error; remote-dependency detail stays server-side
    #[error("{0}")]
    Common(#[from] treetag_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use treetag_common::Error as Common;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::Internal(msg) => {
                error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
            ApiError::Common(common) => match common {
                Common::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
                Common::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
                Common::Config(msg) => {
                    error!("configuration error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIG_ERROR",
                        "service is not configured for this operation".to_string(),
                    )
                }
                // Remote dependency failures surface generically; the detail
                // is only logged
                Common::Store(detail)
                | Common::Media(detail)
                | Common::Ai(detail)
                | Common::Identity(detail) => {
                    error!("remote dependency failure: {detail}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        "a remote service failed; please retry".to_string(),
                    )
                }
                Common::Internal(msg) => {
                    error!("internal error: {msg}");
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
