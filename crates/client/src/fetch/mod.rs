//! Bounded HTTP fetch for target pages and their scripts.
//!
//! ### Request
//! - GET with a fixed browser User-Agent and a per-request timeout (default 3s).
//! - No retries; the orchestrator logs the failure and skips the resource.
//!
//! ### Size Cap
//! - A declared `Content-Length` at or above the cap is rejected before reading.
//! - The body is read chunk by chunk; reaching the cap (default 20MB) rejects
//!   the whole body instead of truncating it.
//!
//! ### Status
//! - Any HTTP status is accepted; error pages are scanned like any other body.

pub mod domain;
pub mod url;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::Client;
use std::time::{Duration, Instant};

pub use domain::{DomainFilter, ScriptGate, registrable_domain, same_registrable_domain};
pub use url::{resolve_reference, validate_targets};

use harvest_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Byte cap; a body reaching it is rejected (default: 20MB)
    pub max_bytes: usize,

    /// Request timeout (default: 3s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), max_bytes: config.max_bytes, timeout: config.timeout() }
    }
}

/// Source of raw document bodies.
///
/// The scrape pipeline only depends on this trait so tests can serve pages
/// from memory.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`, returning the full body.
    async fn fetch(&self, url: &str) -> Result<Bytes, Error>;
}

/// HTTP fetch client with a byte cap.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn too_large(&self, url: &str) -> Error {
        Error::ContentTooLarge { url: url.to_string(), limit: self.config.max_bytes }
    }
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch(&self, url: &str) -> Result<Bytes, Error> {
        let start = Instant::now();

        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch_failed(url, format!("network error: {}", e)))?;

        let status = response.status();

        if let Some(len) = response.content_length()
            && len >= self.config.max_bytes as u64
        {
            return Err(self.too_large(url));
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::fetch_failed(url, format!("failed to read response: {}", e)))?
        {
            body.extend_from_slice(&chunk);
            if body.len() >= self.config.max_bytes {
                return Err(self.too_large(url));
            }
        }

        tracing::debug!(
            "fetched {} (status {}) in {}ms ({} bytes)",
            url,
            status.as_u16(),
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(body.freeze())
    }
}
