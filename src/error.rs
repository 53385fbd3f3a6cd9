//! Error types for the image cache server
//!
//! Store and origin failures are tagged enums so the orchestrator can match on
//! them. Only `ApiError` ever reaches a client.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

// == Store Error ==
/// Failure of a cache slot operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No slot exists for the key
    #[error("cache slot not found: {0}")]
    NotFound(String),

    /// Any other storage failure (permissions, disk, corruption)
    #[error("cache storage failure: {0}")]
    Io(#[from] std::io::Error),
}

// == Fetch Error ==
/// Failure of an origin fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The origin explicitly reported the resource as absent
    #[error("origin has no resource for key: {0}")]
    NotFound(String),

    /// Timeout, DNS, 5xx, malformed response, etc.
    #[error("origin unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "not_found",
            FetchError::Unavailable(_) => "unavailable",
        }
    }
}

// == Config Error ==
/// Startup configuration problems.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

// == Api Error ==
/// Client-visible failure taxonomy.
///
/// Carries no internal detail; every variant renders a fixed plain-text body.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("Image key not specified")]
    BadRequest,

    #[error("Image not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain")],
            self.to_string(),
        )
            .into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, ApiError>;
