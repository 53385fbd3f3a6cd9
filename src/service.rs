//! Cache-aside request protocol
//!
//! `CacheService` decides what each GET/PUT/DELETE does with the store and the
//! origin, and classifies every failure into an [`ApiError`]. It holds no
//! per-request state; concurrent requests only share the cache directory and
//! the counters.
//!
//! Two concurrent misses for the same key may both fetch and both write back.
//! The last write wins.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{error, warn};

use crate::cache::{CacheStats, FileStore};
use crate::error::{ApiError, Result, StoreError};
use crate::origin::Origin;

/// Content type of every image payload served.
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

// == Reply ==
/// Successful request outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Payload served, with whether it came from a cache slot
    Image { data: Bytes, from_cache: bool },
    /// PUT stored the body
    Saved,
    /// DELETE removed the slot
    Deleted,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Image { data, from_cache } => {
                let mut response =
                    (StatusCode::OK, [(header::CONTENT_TYPE, IMAGE_CONTENT_TYPE)], data)
                        .into_response();
                let cache = if from_cache { "HIT" } else { "MISS" };
                response
                    .headers_mut()
                    .insert("x-cache", HeaderValue::from_static(cache));
                response
            }
            Reply::Saved => (
                StatusCode::CREATED,
                [(header::CONTENT_TYPE, "text/plain")],
                "Image saved",
            )
                .into_response(),
            Reply::Deleted => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain")],
                "Image deleted",
            )
                .into_response(),
        }
    }
}

// == Cache Service ==
/// Coordinates the file store and the origin.
#[derive(Clone)]
pub struct CacheService {
    store: FileStore,
    origin: Arc<dyn Origin>,
    stats: Arc<CacheStats>,
}

impl CacheService {
    pub fn new(store: FileStore, origin: Arc<dyn Origin>) -> Self {
        Self {
            store,
            origin,
            stats: Arc::new(CacheStats::new()),
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    // == Get ==
    /// Serves `key` from its slot, or fetches it from the origin and back-fills.
    ///
    /// A failed back-fill is logged and counted; the fetched payload is still
    /// returned.
    pub async fn get(&self, key: &str) -> Result<Reply> {
        let key = require_key(key)?;

        match self.store.read(key).await {
            Ok(data) => {
                self.stats.record_hit();
                Ok(Reply::Image {
                    data,
                    from_cache: true,
                })
            }
            Err(StoreError::NotFound(_)) => {
                self.stats.record_miss();
                self.fetch_and_backfill(key).await
            }
            Err(StoreError::Io(e)) => {
                error!(key, error = %e, "Failed to read cache slot");
                Err(ApiError::Internal)
            }
        }
    }

    async fn fetch_and_backfill(&self, key: &str) -> Result<Reply> {
        let data = match self.origin.fetch(key).await {
            Ok(data) => data,
            Err(e) => {
                self.stats.record_origin_failure();
                warn!(key, kind = e.kind(), error = %e, "Origin fetch failed");
                return Err(ApiError::NotFound);
            }
        };

        if let Err(e) = self.store.write(key, &data).await {
            self.stats.record_backfill_failure();
            warn!(key, error = %e, "Failed to back-fill cache slot");
        }

        Ok(Reply::Image {
            data,
            from_cache: false,
        })
    }

    // == Put ==
    /// Stores `body` as the complete payload for `key`.
    pub async fn put(&self, key: &str, body: &[u8]) -> Result<Reply> {
        let key = require_key(key)?;

        match self.store.write(key, body).await {
            Ok(()) => {
                self.stats.record_write();
                Ok(Reply::Saved)
            }
            Err(e) => {
                error!(key, error = %e, "Failed to write cache slot");
                Err(ApiError::Internal)
            }
        }
    }

    // == Delete ==
    /// Removes the slot for `key`. Not idempotent: a second delete is a 404.
    pub async fn delete(&self, key: &str) -> Result<Reply> {
        let key = require_key(key)?;

        match self.store.delete(key).await {
            Ok(()) => {
                self.stats.record_delete();
                Ok(Reply::Deleted)
            }
            Err(StoreError::NotFound(_)) => Err(ApiError::NotFound),
            Err(StoreError::Io(e)) => {
                error!(key, error = %e, "Failed to delete cache slot");
                Err(ApiError::Internal)
            }
        }
    }
}

/// Rejects the empty key before any store or origin call.
fn require_key(key: &str) -> Result<&str> {
    if key.is_empty() {
        Err(ApiError::BadRequest)
    } else {
        Ok(key)
    }
}
