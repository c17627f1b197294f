use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| Error::ConfigError(format!("invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| Error::ConfigError(format!("tracing already initialised: {}", e)))
}

pub fn trace_price_resolution(coin: &str) -> Span {
    tracing::info_span!(
        "price_resolution",
        coin = %coin,
    )
}

pub fn trace_chart_lookup(coin: &str, granularity: &str) -> Span {
    tracing::info_span!(
        "chart_lookup",
        coin = %coin,
        granularity = %granularity,
    )
}
