//! API Module
//!
//! HTTP adapter for the image cache.
//!
//! # Endpoints
//! - `GET /{key}` - Cached image, fetched from the origin on a miss
//! - `PUT /{key}` - Store an image directly
//! - `DELETE /{key}` - Invalidate a cached image

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
