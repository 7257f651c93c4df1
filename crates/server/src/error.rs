//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use syracuse_cache::{Backend, CacheError};

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Cache(#[from] CacheError),

    #[error("metadata error: {0}")]
    Metadata(#[from] syracuse_metadata::MetadataError),

    #[error("{0}")]
    Core(#[from] syracuse_core::Error),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
            Self::Cache(e) => match e {
                CacheError::StoreUnavailable { .. } => "store_unavailable",
                CacheError::WriteFailed {
                    stage: Backend::Blob,
                    ..
                } => "write_failed_blob",
                CacheError::WriteFailed {
                    stage: Backend::Metadata,
                    ..
                } => "write_failed_metadata",
                CacheError::InvalidRecord(_) => "invalid_record",
                CacheError::Compute(e) => core_code(e),
            },
            Self::Metadata(_) => "metadata_error",
            Self::Core(e) => core_code(e),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cache(e) => match e {
                CacheError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                CacheError::WriteFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                CacheError::InvalidRecord(_) | CacheError::Compute(_) => StatusCode::BAD_REQUEST,
            },
            Self::Metadata(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Core(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn core_code(e: &syracuse_core::Error) -> &'static str {
    match e {
        syracuse_core::Error::InvalidNumber(_) | syracuse_core::Error::Overflow(_) => {
            "invalid_number"
        }
        syracuse_core::Error::InvalidTrajectory(_) | syracuse_core::Error::TrajectoryParse(_) => {
            "invalid_record"
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Cache(e) = &self {
            crate::metrics::record_cache_error(e);
        }
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
