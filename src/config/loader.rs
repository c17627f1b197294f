use std::path::Path;
use crate::config::*;
use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub providers: ProvidersConfig,
    pub cache: CacheConfig,
    pub history: HistoryConfig,
    pub warmup: WarmupConfig,
    pub aliases: Vec<CoinAlias>,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Layers `config/default`, `config/{env}` and `COINPRICE__*` environment
    /// variables over the built-in defaults. Both files are optional.
    pub fn load(env: &str) -> Result<Self> {
        Self::load_from(Path::new("config"), env)
    }

    pub fn load_from(dir: &Path, env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join(env)).required(false))
            .add_source(
                Environment::with_prefix("COINPRICE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        config.try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))
    }
}
