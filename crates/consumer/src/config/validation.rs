//! Configuration validation for providers.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{ProviderConfig, ProvidersConfig};

static PROVIDER_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9._-]+$").expect("provider name regex should compile"));

/// Validate the entire providers configuration.
pub fn validate_config(config: &ProvidersConfig) -> Result<(), ValidationError> {
    if config.timeout_secs == Some(0) {
        return Err(ValidationError::InvalidTimeout);
    }

    let mut seen = HashSet::new();
    for provider in &config.providers {
        validate_provider_name(&provider.name)?;
        if !seen.insert(provider.name.as_str()) {
            return Err(ValidationError::DuplicateProvider {
                name: provider.name.clone(),
            });
        }
        validate_provider(provider)?;
        debug!("Validated provider configuration: {}", provider.name);
    }
    Ok(())
}

/// Validate a provider name.
pub fn validate_provider_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::InvalidProviderName {
            name: name.to_string(),
            reason: "Provider name cannot be empty".to_string(),
        });
    }

    if !PROVIDER_NAME_REGEX.is_match(name) {
        return Err(ValidationError::InvalidProviderName {
            name: name.to_string(),
            reason: "Provider name must contain only lowercase letters, numbers, dots, underscores, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Validate a single provider configuration.
fn validate_provider(provider: &ProviderConfig) -> Result<(), ValidationError> {
    validate_api_url(provider)?;

    if provider.schemes.is_empty() {
        return Err(ValidationError::MissingSchemes {
            name: provider.name.clone(),
        });
    }
    if provider.schemes.iter().any(|scheme| scheme.trim().is_empty()) {
        return Err(ValidationError::EmptyScheme {
            name: provider.name.clone(),
        });
    }

    Ok(())
}

/// Basic shape check: the API URL must parse and use http or https.
fn validate_api_url(provider: &ProviderConfig) -> Result<(), ValidationError> {
    let candidate = provider.api_url.replace("{format}", "json");
    let parsed = Url::parse(&candidate).map_err(|error| ValidationError::InvalidApiUrl {
        name: provider.name.clone(),
        reason: error.to_string(),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ValidationError::InvalidApiUrl {
            name: provider.name.clone(),
            reason: format!("Unsupported URL scheme: {} (expected http/https)", scheme),
        });
    }

    Ok(())
}

/// Errors that can occur during validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid provider name '{name}': {reason}")]
    InvalidProviderName { name: String, reason: String },

    #[error("Provider '{name}' is declared more than once")]
    DuplicateProvider { name: String },

    #[error("Invalid API URL for provider '{name}': {reason}")]
    InvalidApiUrl { name: String, reason: String },

    #[error("Provider '{name}' declares no URL schemes")]
    MissingSchemes { name: String },

    #[error("Provider '{name}' declares an empty URL scheme")]
    EmptyScheme { name: String },

    #[error("timeoutSecs must be greater than zero")]
    InvalidTimeout,
}
