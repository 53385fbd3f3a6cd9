//! Origin fetching
//!
//! The origin is the remote image service consulted on a cache miss. It is
//! reached through the [`Origin`] trait so the orchestrator can be driven by
//! a fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::FetchError;

/// Remote source of payloads, keyed like the cache.
#[async_trait]
pub trait Origin: Send + Sync {
    /// Retrieves the payload for `key`.
    async fn fetch(&self, key: &str) -> Result<Bytes, FetchError>;
}

/// Origin backed by `GET {base_url}/{key}`.
#[derive(Debug, Clone)]
pub struct HttpOrigin {
    client: Client,
    base_url: String,
}

impl HttpOrigin {
    /// Creates an origin client with a bounded per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL fetched for `key`.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl Origin for HttpOrigin {
    async fn fetch(&self, key: &str) -> Result<Bytes, FetchError> {
        let url = self.url_for(key);
        debug!(url = %url, "Fetching from origin");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Unavailable(format!(
                "origin returned status {}",
                status
            )));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        debug!(url = %url, size = data.len(), "Fetched from origin");
        Ok(data)
    }
}
