use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use oembed::config::{ProviderConfig, ProvidersConfig, load_config, load_config_from_path, validate_config};
use oembed::{QueryParams, ResponseFormat};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Fetch the oEmbed representation of a resource URL.
#[derive(Debug, Parser)]
#[command(name = "oembed", version)]
struct Cli {
    /// Resource URL to embed (e.g. a photo or video page)
    url: String,

    /// Response format requested from the provider (json or xml)
    #[arg(long, default_value_t = ResponseFormat::Json)]
    format: ResponseFormat,

    /// Maximum width hint forwarded to the provider
    #[arg(long)]
    maxwidth: Option<u32>,

    /// Maximum height hint forwarded to the provider
    #[arg(long)]
    maxheight: Option<u32>,

    /// Providers file; defaults to $OEMBED_PROVIDERS_PATH or the user config directory
    #[arg(long)]
    providers: Option<PathBuf>,

    /// Ad-hoc provider API URL, tried before configured providers
    #[arg(long, requires = "schemes")]
    endpoint: Option<String>,

    /// URL pattern served by --endpoint (repeatable)
    #[arg(long = "scheme")]
    schemes: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the provider request URL instead of fetching it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    let consumer = config.build_consumer().context("build consumer from providers configuration")?;

    let format = cli.format;
    let mut params = QueryParams::new();
    if let Some(maxwidth) = cli.maxwidth {
        params.insert("maxwidth".to_string(), maxwidth.to_string());
    }
    if let Some(maxheight) = cli.maxheight {
        params.insert("maxheight".to_string(), maxheight.to_string());
    }

    if cli.dry_run {
        let endpoint = consumer
            .resolve(&cli.url)
            .with_context(|| format!("no endpoint available for {}", cli.url))?;
        params.insert("format".to_string(), format.as_str().to_string());
        println!("{}", endpoint.build_request_url(&cli.url, &params));
        return Ok(());
    }

    let response = consumer.embed_with(&cli.url, format.as_str(), &params).await?;
    info!(kind = %response.kind(), provider = response.provider_name().unwrap_or("<unknown>"), "embedded resource");
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// `RUST_LOG` directives, or `info` when unset or unparsable.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(cli: &Cli) -> Result<ProvidersConfig> {
    let mut config = match &cli.providers {
        Some(path) => {
            load_config_from_path(path).with_context(|| format!("load providers from {}", path.display()))?
        }
        None => load_config().context("load providers from the default location")?,
    };

    if let Some(api_url) = &cli.endpoint {
        config.providers.insert(
            0,
            ProviderConfig {
                name: "command-line".to_string(),
                api_url: api_url.clone(),
                schemes: cli.schemes.clone(),
                ..Default::default()
            },
        );
    }
    if cli.timeout_secs.is_some() {
        config.timeout_secs = cli.timeout_secs;
    }

    validate_config(&config).context("invalid provider configuration")?;
    Ok(config)
}
