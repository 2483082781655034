//! Error types for flora-id
//!
//! Two layers:
//! - `ResolveError`: failures of the resolution pipeline (service layer)
//! - `ApiError`: HTTP-facing errors rendered as `{"error": {"code", "message"}}`

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::ServiceError;

/// Resolution pipeline error
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Query or upload rejected before any service call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External service failure (transport or non-success status)
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Identification service returned no suggestions
    #[error("No plant identification found for this photo")]
    NoIdentification,

    /// Bounded detail generation never produced a complete record
    #[error(
        "Could not retrieve plant details after {attempts} attempts. \
         Please try again later or search with the scientific name."
    )]
    DetailsUnavailable { attempts: u32 },
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream service failed (502)
    #[error("Upstream service error: {0}")]
    BadGateway(String),

    /// Temporarily unable to produce a result (503)
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ResolveError::NoIdentification => ApiError::NotFound(err.to_string()),
            ResolveError::DetailsUnavailable { .. } => ApiError::Unavailable(err.to_string()),
            ResolveError::Service(e) => ApiError::BadGateway(e.to_string()),
        }
    }
}

// Extractor rejections share the JSON error envelope

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "DETAILS_UNAVAILABLE", msg)
            }
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
