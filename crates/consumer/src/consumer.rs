//! The top-level consumer.
//!
//! A [`Consumer`] owns an ordered list of endpoints. Insertion order is the
//! resolution priority: when several endpoints match a URL, the one added
//! first serves it.

use std::fmt;
use std::sync::Arc;

use oembed_api::{Fetcher, HttpFetcher};
use oembed_types::{OembedResponse, ResponseFormat};
use oembed_util::block_on_future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::endpoint::{Endpoint, QueryParams};
use crate::error::{OembedError, Result};

/// Resolves resource URLs to endpoints and fetches validated responses.
///
/// Each `embed` call is independent; the only state is the endpoint
/// registry and the shared [`Fetcher`].
#[derive(Clone)]
pub struct Consumer {
    endpoints: Vec<Endpoint>,
    fetcher: Arc<dyn Fetcher>,
}

impl Consumer {
    /// Create a consumer backed by an [`HttpFetcher`] with the default timeout.
    pub fn new() -> Result<Self> {
        let fetcher = HttpFetcher::new()?;
        Ok(Self::with_fetcher(Arc::new(fetcher)))
    }

    /// Create a consumer that performs requests through `fetcher`.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            endpoints: Vec::new(),
            fetcher,
        }
    }

    /// Append an endpoint. Later endpoints lose ties to earlier ones.
    pub fn add_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoints.push(endpoint);
    }

    /// Remove the first endpoint equal to `endpoint`. Returns whether one was removed.
    pub fn remove_endpoint(&mut self, endpoint: &Endpoint) -> bool {
        match self.endpoints.iter().position(|candidate| candidate == endpoint) {
            Some(index) => {
                self.endpoints.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_endpoints(&mut self) {
        self.endpoints.clear();
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Mutable access for reconfiguring the patterns of registered endpoints.
    pub fn endpoints_mut(&mut self) -> &mut [Endpoint] {
        &mut self.endpoints
    }

    /// The first endpoint, in insertion order, with a pattern matching `url`.
    pub fn resolve(&self, url: &str) -> Option<&Endpoint> {
        let endpoint = self.endpoints.iter().find(|endpoint| endpoint.matches_url(url));
        match endpoint {
            Some(endpoint) => debug!(url = %url, api_url = %endpoint.api_url(), "resolved endpoint"),
            None => debug!(url = %url, endpoint_count = self.endpoints.len(), "no endpoint matched"),
        }
        endpoint
    }

    /// Fetch the JSON representation of `url` with no extra parameters.
    pub async fn embed(&self, url: &str) -> Result<OembedResponse> {
        self.embed_with(url, ResponseFormat::default().as_str(), &QueryParams::new())
            .await
    }

    /// Fetch the representation of `url` in `format` (`json` or `xml`),
    /// forwarding `extra_params` (for example `maxwidth`) to the provider.
    pub async fn embed_with(&self, url: &str, format: &str, extra_params: &QueryParams) -> Result<OembedResponse> {
        self.embed_cancellable(url, format, extra_params, &CancellationToken::new())
            .await
    }

    /// Like [`Consumer::embed_with`], aborting the fetch when `cancel` fires.
    ///
    /// # Errors
    /// - [`OembedError::InvalidRequest`] for a format other than `json`/`xml`,
    ///   raised before any network activity.
    /// - [`OembedError::NoEndpointAvailable`] when no endpoint matches `url`.
    /// - [`OembedError::Transport`] carrying the fetcher's error unchanged.
    /// - Classification, decoding and validation errors from
    ///   [`Endpoint::classify_and_parse`].
    pub async fn embed_cancellable(
        &self,
        url: &str,
        format: &str,
        extra_params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<OembedResponse> {
        let format: ResponseFormat = format.parse()?;
        let endpoint = self.resolve(url).ok_or_else(|| OembedError::no_endpoint(url))?;

        let mut params = extra_params.clone();
        params.insert("format".to_string(), format.as_str().to_string());
        endpoint.get(self.fetcher.as_ref(), url, &params, cancel).await
    }

    /// Blocking form of [`Consumer::embed_with`] for synchronous callers.
    ///
    /// Must not be called from a current-thread Tokio runtime.
    pub fn embed_blocking(&self, url: &str, format: &str, extra_params: &QueryParams) -> Result<OembedResponse> {
        block_on_future(self.embed_with(url, format, extra_params))
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
