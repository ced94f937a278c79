//! Configuration IO helpers for the provider registry.

use std::env;
use std::fs;
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use oembed_util::{app_file_path, expand_tilde};
use tracing::debug;

use crate::config::{ConfigError, ProvidersConfig, validate_config};

/// Environment variable allowing callers to override the providers file path.
pub const PROVIDERS_PATH_ENV: &str = "OEMBED_PROVIDERS_PATH";

/// Returns the default path for the providers configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(PROVIDERS_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    app_file_path(config_dir(), "oembed", "providers.json")
}

/// Loads and validates the providers configuration from the default path.
pub fn load_config() -> Result<ProvidersConfig, ConfigError> {
    let path = default_config_path();
    load_config_from_path(&path)
}

/// Loads and validates the providers configuration from a specific path.
///
/// A missing file yields an empty configuration.
pub fn load_config_from_path(path: &Path) -> Result<ProvidersConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "providers file not found; using empty configuration");
        return Ok(ProvidersConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: ProvidersConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    debug!(path = %path.display(), providers = config.providers.len(), "loaded providers configuration");
    Ok(config)
}

/// Saves the providers configuration to a specific path.
pub fn save_config_to_path(config: &ProvidersConfig, path: &Path) -> Result<(), ConfigError> {
    validate_config(config)?;
    if let Some(parent_directory) = path.parent() {
        create_dir_all(parent_directory)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    write(path, content)?;
    Ok(())
}
