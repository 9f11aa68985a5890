//! HTTP transport
//!
//! This module owns the single HTTP client used for a run:
//! - Building the client with a browser-like header set
//! - Single-attempt GET requests with a fixed timeout
//! - Error classification (timeout, connection, status)
//!
//! Retrying is left to [`RetryingFetcher`](super::RetryingFetcher).

use crate::config::RequestConfig;
use crate::{HarvestError, Result};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Single-attempt HTTP transport around one pooled client
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    /// Creates a transport from the request configuration
    ///
    /// # Arguments
    ///
    /// * `config` - User agent and timeout settings
    ///
    /// # Returns
    ///
    /// * `Ok(Transport)` - Ready to issue requests
    /// * `Err(HarvestError::Client)` - The client could not be built
    pub fn new(config: &RequestConfig) -> Result<Self> {
        let client = build_http_client(config).map_err(HarvestError::Client)?;
        Ok(Self { client })
    }

    /// Fetches `url` once
    ///
    /// # Returns
    ///
    /// * `Ok((bytes, status))` - Body and status of a 2xx response
    /// * `Err(HarvestError::Timeout)` - The request timed out
    /// * `Err(HarvestError::Status)` - The server answered with a non-2xx status
    /// * `Err(HarvestError::Http)` - Connection or protocol failure
    pub async fn fetch(&self, url: &Url) -> Result<(Vec<u8>, u16)> {
        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok((body.to_vec(), status.as_u16()))
    }
}

/// Builds the HTTP client
///
/// Compression negotiation is handled by reqwest's gzip and brotli support,
/// so no Accept-Encoding header is set by hand.
pub fn build_http_client(config: &RequestConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(browser_headers())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    for (name, value) in [
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

fn classify_error(url: &Url, error: reqwest::Error) -> HarvestError {
    if error.is_timeout() {
        HarvestError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_builder() {
        HarvestError::Client(error)
    } else {
        HarvestError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
