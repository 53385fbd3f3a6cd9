//! API Routes
//!
//! Configures the Axum router for the image cache.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::any,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::handlers::{dispatch, log_request, panic_response, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /{key}` - Serve from cache, fetching from the origin on a miss
/// - `PUT /{key}` - Store the request body as the image for `key`
/// - `DELETE /{key}` - Remove the cached image for `key`
///
/// Any other method answers 405, a request without a key answers 400. Paths
/// with more than one segment are keyed by their first segment.
///
/// # Middleware
/// - Body limit: PUT bodies above `max_body_bytes` answer 413
/// - Catch panic: a panicking handler answers 500
/// - Request log: one line per request with method and status
/// - Tracing: per-request spans
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", any(dispatch))
        .route("/:key", any(dispatch))
        .fallback(dispatch)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
