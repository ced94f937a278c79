//! oEmbed provider transport.
//!
//! This crate is the single network boundary of the consumer. It focuses on:
//!
//! - A [`Fetcher`] trait so callers can substitute their own transport
//! - A reqwest-backed [`HttpFetcher`] with a bounded request timeout
//! - Sending a per-endpoint `User-Agent` with every GET
//! - Reporting connection failures, timeouts and non-2xx statuses as
//!   [`TransportError`] without retrying
//!
//! # Example
//!
//! ```ignore
//! use oembed_api::{FetchRequest, Fetcher, HttpFetcher};
//!
//! async fn run() -> Result<(), oembed_api::TransportError> {
//!     let fetcher = HttpFetcher::new()?;
//!     let reply = fetcher
//!         .fetch(&FetchRequest::new("http://www.flickr.com/services/oembed?url=...", "oembed-rs/0.1"))
//!         .await?;
//!     println!("content type: {:?}", reply.content_type);
//!     Ok(())
//! }
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, header};
use thiserror::Error;
use tracing::{debug, warn};

/// Default upper bound on a single provider request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on establishing the connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully built outbound GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub user_agent: String,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// A successful reply as seen by the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub status: u16,
    /// Raw `Content-Type` header, when the provider sent one.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Errors produced by the transport. They are surfaced to callers unchanged.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not build the HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("provider returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} was cancelled")]
    Cancelled { url: String },
}

impl TransportError {
    /// Create a cancellation error for the given request URL.
    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::Cancelled { url: url.into() }
    }

    /// HTTP status of the failed reply, when the failure was a status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Performs the GET for an already built request URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse, TransportError>;
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for provider access.
///
/// Every request is bounded by the configured timeout; the wrapper never
/// retries.
pub struct HttpFetcher {
    http: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Construct a fetcher with [`DEFAULT_TIMEOUT`].
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Construct a fetcher whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json, text/xml;q=0.9, application/xml;q=0.9, */*;q=0.1"),
        );

        let http = Client::builder()
            .default_headers(default_headers)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Client { source })?;

        Ok(Self { http, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The timeout in whole milliseconds, saturating at `u64::MAX`.
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Read a header as text. Bytes outside visible ASCII are replaced rather than
/// dropping the header, so only an absent header yields `None`.
fn header_text(headers: &header::HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse, TransportError> {
        let start = Instant::now();
        debug!(url = %request.url, user_agent = %request.user_agent, "provider request started");

        let response = self
            .http
            .get(&request.url)
            .header(header::USER_AGENT, &request.user_agent)
            .send()
            .await
            .map_err(|error| self.classify_error(&request.url, error))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %request.url,
                status = %status,
                duration_ms = start.elapsed().as_millis(),
                "provider request failed"
            );
            return Err(TransportError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let content_type = header_text(response.headers(), header::CONTENT_TYPE);
        let body = response
            .bytes()
            .await
            .map_err(|error| self.classify_error(&request.url, error))?
            .to_vec();

        debug!(
            url = %request.url,
            status = %status,
            content_type = content_type.as_deref().unwrap_or("<none>"),
            body_len = body.len(),
            duration_ms = start.elapsed().as_millis(),
            "provider request completed"
        );
        Ok(FetchedResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

impl HttpFetcher {
    fn classify_error(&self, url: &str, error: reqwest::Error) -> TransportError {
        warn!(url = %url, error = %error, "provider request errored");
        if error.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout_ms(),
            }
        } else {
            TransportError::Network {
                url: url.to_string(),
                source: error,
            }
        }
    }
}
