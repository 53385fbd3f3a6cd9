//! Image Cache - A read-through file cache for a remote image service
//!
//! Serves images from a cache directory, fetching and storing them from the
//! origin on a miss. Clients may also write or delete cached images directly.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod origin;
pub mod service;

pub use api::AppState;
pub use config::Config;
pub use service::{CacheService, Reply};
