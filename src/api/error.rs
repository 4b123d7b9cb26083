//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Component configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Page shell could not be retrieved
    #[error("Page error: {0}")]
    Page(#[from] crate::page::PageError),

    /// Fragment source could not be built
    #[error("Source error: {0}")]
    Source(#[from] crate::components::FetchError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            ApiError::Page(_) => (StatusCode::SERVICE_UNAVAILABLE, "SHELL_UNAVAILABLE"),
            ApiError::Source(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SOURCE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::FetchError;
    use crate::page::PageError;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::Page(PageError::Shell {
            path: "index.html".to_string(),
            source: FetchError::NotFound("index.html".to_string()),
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::SERVICE_UNAVAILABLE, "SHELL_UNAVAILABLE")
        );

        let err = ApiError::NotFound("no assembly yet".to_string());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
