//! HTTP transport for the flights backend.
//!
//! The backend takes form-encoded POSTs and answers with text. This module
//! only moves bytes; encoding lives in `codec` and decoding in `convert`.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use super::codec::Rpc;
use super::error::TransportError;

/// Default base URL of the flights frontend data API.
pub const DEFAULT_BASE_URL: &str = "https://www.google.com/_/FlightsFrontendUi/data/";

/// Content type the RPC dispatcher expects.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest error body kept in a `TransportError::Status`.
const MAX_ERROR_BODY: usize = 500;

/// Something that can deliver an encoded request and return the raw body.
///
/// Implementations own timeouts. A failure is a single `TransportError`,
/// never a partial body.
pub trait Transport {
    fn post(
        &self,
        rpc: Rpc,
        body: String,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct FlightsConfig {
    /// Base URL; RPC paths are appended to it.
    pub base_url: String,
    /// `Content-Type` header sent with every request.
    pub content_type: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl FlightsConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Full URL for an RPC.
    pub fn url(&self, rpc: Rpc) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, rpc.path())
        } else {
            format!("{}/{}", self.base_url, rpc.path())
        }
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    config: FlightsConfig,
}

impl HttpTransport {
    pub fn new(config: FlightsConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();

        let content_type = HeaderValue::from_str(&config.content_type)
            .map_err(|_| TransportError::Config("invalid content type header".to_string()))?;
        headers.insert(CONTENT_TYPE, content_type);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &FlightsConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    async fn post(&self, rpc: Rpc, body: String) -> Result<String, TransportError> {
        let url = self.config.url(rpc);
        debug!(rpc = rpc.name(), bytes = body.len(), "posting request");

        let response = self.http.post(&url).body(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let text = response.text().await?;
        debug!(rpc = rpc.name(), bytes = text.len(), "response received");
        Ok(text)
    }
}
