//! Provider registry configuration.
//! This module handles parsing and validation of the
//! ~/.config/oembed/providers.json file and turns it into a [`Consumer`].
//!
//! [`Consumer`]: crate::Consumer

mod io;
mod model;
mod validation;

pub use io::{PROVIDERS_PATH_ENV, default_config_path, load_config, load_config_from_path, save_config_to_path};
pub use model::{ConfigError, ProviderConfig, ProvidersConfig};
pub use validation::{ValidationError, validate_config, validate_provider_name};
