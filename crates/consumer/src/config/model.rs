//! Data models for provider configuration.

use std::sync::Arc;
use std::time::Duration;

use oembed_api::{DEFAULT_TIMEOUT, Fetcher, HttpFetcher, TransportError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consumer::Consumer;
use crate::endpoint::Endpoint;
use crate::error::OembedError;

/// Provider configuration: fetch settings plus the ordered provider list.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProvidersConfig {
    /// Per-request timeout in seconds. Defaults to 30.
    pub timeout_secs: Option<u64>,
    /// `User-Agent` applied to providers that do not set their own.
    pub user_agent: Option<String>,
    /// Providers in resolution priority order.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Configuration for a single provider endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProviderConfig {
    /// Short identifier used in logs and validation messages.
    pub name: String,
    /// API endpoint, optionally containing a `{format}` placeholder.
    pub api_url: String,
    /// URL patterns served by this provider (wildcard or `regex:`).
    #[serde(default)]
    pub schemes: Vec<String>,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Whether this provider is skipped when building a consumer.
    #[serde(default)]
    pub disabled: bool,
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|provider| !provider.disabled)
    }

    /// Build endpoints for every enabled provider, in file order.
    pub fn endpoints(&self) -> Result<Vec<Endpoint>, ConfigError> {
        self.enabled_providers()
            .map(|provider| -> Result<Endpoint, ConfigError> {
                let mut endpoint = provider.to_endpoint()?;
                if provider.user_agent.is_none()
                    && let Some(user_agent) = &self.user_agent
                {
                    endpoint.set_user_agent(user_agent.clone());
                }
                Ok(endpoint)
            })
            .collect()
    }

    /// Build a consumer backed by an [`HttpFetcher`] using the configured timeout.
    pub fn build_consumer(&self) -> Result<Consumer, ConfigError> {
        let fetcher = HttpFetcher::with_timeout(self.timeout())?;
        self.build_consumer_with_fetcher(Arc::new(fetcher))
    }

    /// Build a consumer that performs requests through `fetcher`.
    pub fn build_consumer_with_fetcher(&self, fetcher: Arc<dyn Fetcher>) -> Result<Consumer, ConfigError> {
        let mut consumer = Consumer::with_fetcher(fetcher);
        for endpoint in self.endpoints()? {
            consumer.add_endpoint(endpoint);
        }
        Ok(consumer)
    }
}

impl ProviderConfig {
    /// Compile this provider's schemes into an [`Endpoint`].
    pub fn to_endpoint(&self) -> Result<Endpoint, OembedError> {
        let mut endpoint = Endpoint::with_patterns(self.api_url.as_str(), &self.schemes)?;
        if let Some(user_agent) = &self.user_agent {
            endpoint.set_user_agent(user_agent.clone());
        }
        Ok(endpoint)
    }
}

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] crate::config::ValidationError),

    #[error("Endpoint error: {0}")]
    Endpoint(#[from] OembedError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
