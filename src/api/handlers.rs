//! API Handlers
//!
//! Turns an inbound request into `{method, key, body}`, runs it through the
//! [`CacheService`] and renders the outcome.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::cache::FileStore;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::origin::{HttpOrigin, Origin};
use crate::service::{CacheService, Reply};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: CacheService,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: CacheService) -> Self {
        Self { service }
    }

    /// Creates a new AppState with the given store and origin.
    pub fn with_origin(store: FileStore, origin: Arc<dyn Origin>) -> Self {
        Self::new(CacheService::new(store, origin))
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses the file store under `cache_dir` and the HTTP origin at `origin_url`.
    pub fn from_config(config: &Config) -> std::result::Result<Self, reqwest::Error> {
        let origin = HttpOrigin::new(config.origin_url.clone(), config.fetch_timeout)?;
        Ok(Self::with_origin(
            FileStore::new(config.cache_dir.clone()),
            Arc::new(origin),
        ))
    }
}

/// Returns the first path segment of a request path, or `""` if there is none.
///
/// The segment is used verbatim: no percent-decoding and no character checks.
pub fn key_from_path(path: &str) -> &str {
    path.split('/').nth(1).unwrap_or("")
}

/// Handler for every method on every path.
///
/// A missing key is rejected before the method is looked at.
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let key = key_from_path(request.uri().path()).to_string();

    match handle(&state, method, &key, request).await {
        Ok(reply) => reply.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn handle(state: &AppState, method: Method, key: &str, request: Request) -> Result<Reply> {
    if key.is_empty() {
        return Err(ApiError::BadRequest);
    }

    match method {
        Method::GET => state.service.get(key).await,
        Method::PUT => {
            let body = read_body(request, state).await?;
            state.service.put(key, &body).await
        }
        Method::DELETE => state.service.delete(key).await,
        _ => Err(ApiError::MethodNotAllowed),
    }
}

/// Buffers the whole request body, bounded by the router's body limit.
async fn read_body(request: Request, state: &AppState) -> Result<Bytes> {
    Bytes::from_request(request, state)
        .await
        .map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge
            } else {
                error!(error = %rejection, "Failed to read request body");
                ApiError::Internal
            }
        })
}

/// Middleware that emits one log line per request with its final status.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let key = key_from_path(request.uri().path()).to_string();

    let response = next.run(request).await;

    info!(
        method = %method,
        key = %key,
        status = response.status().as_u16(),
        "Request handled"
    );
    response
}

/// Response sent when a handler panics.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    error!(panic = detail, "Request handler panicked");
    ApiError::Internal.into_response()
}
