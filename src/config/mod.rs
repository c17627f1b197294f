use std::time::Duration;
use serde::{Deserialize, Serialize};

pub mod loader;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3030,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream price providers, in no particular order. Fallback order is
/// fixed by the registry, not by this config.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub binance_url: String,
    pub coingecko_url: String,
    pub cryptocompare_url: String,
    pub coincap_url: String,
    pub timeout_ms: u64,
    pub cooldown_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            binance_url: "https://api.binance.com".to_string(),
            coingecko_url: "https://api.coingecko.com".to_string(),
            cryptocompare_url: "https://min-api.cryptocompare.com".to_string(),
            coincap_url: "https://api.coincap.io".to_string(),
            timeout_ms: 10_000,
            cooldown_secs: 1_200,  // 20 minutes
        }
    }
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub price_ttl_secs: u64,
    pub history_ttl_secs: u64,
    /// Upper bound on cached coins per cache. Unbounded when absent.
    pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            price_ttl_secs: 15,
            history_ttl_secs: 86_400,  // 24 hours
            max_entries: None,
        }
    }
}

impl CacheConfig {
    pub fn price_ttl(&self) -> Duration {
        Duration::from_secs(self.price_ttl_secs)
    }

    pub fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_secs)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub snapshot_dir: String,
    pub coingecko_url: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            snapshot_dir: "aggregation/history".to_string(),
            coingecko_url: "https://api.coingecko.com".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct WarmupConfig {
    pub enabled: bool,
    pub coins: Vec<String>,
    pub spacing_secs: u64,
    pub check_interval_secs: u64,
}

pub const POPULAR_COINS: [&str; 13] = [
    "bitcoin",
    "ethereum",
    "ripple",
    "tether",
    "usd-coin",
    "binance-usd",
    "cardano",
    "polkadot",
    "dogecoin",
    "shiba-inu",
    "litecoin",
    "solana",
    "polo-gold",
];

impl Default for WarmupConfig {
    fn default() -> Self {
        WarmupConfig {
            enabled: true,
            coins: POPULAR_COINS.iter().map(|c| c.to_string()).collect(),
            spacing_secs: 10,
            check_interval_secs: 3_600,  // 1 hour
        }
    }
}

impl WarmupConfig {
    pub fn spacing(&self) -> Duration {
        Duration::from_secs(self.spacing_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

/// Coin added on top of the built-in alias table.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CoinAlias {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub short_names: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            json: false,
            filter: "info".to_string(),
        }
    }
}
