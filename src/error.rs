use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Upstream Errors
    #[error("Upstream request to {url} failed: {reason}")]
    Upstream {
        url: String,
        reason: String,
    },

    #[error("Provider {provider} failed: {reason}")]
    ProviderTransport {
        provider: String,
        reason: String,
    },

    #[error("Provider {provider} returned no price for {coin}")]
    ProviderNoData {
        provider: String,
        coin: String,
    },

    #[error("No price provider available for {coin}")]
    NoProviderAvailable {
        coin: String,
    },

    // Input Errors
    #[error("Missing coin parameter")]
    MissingCoin,

    #[error("Invalid coin parameter: {0}")]
    InvalidCoin(String),

    // Chart History Errors
    #[error("Chart history unavailable: {0}")]
    HistoryUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization failed: {0}")]
    DeserializationError(String),

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    // IO Errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Whether a provider should be put on cooldown for this failure.
    pub fn penalizes_provider(&self) -> bool {
        matches!(self, Error::ProviderTransport { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
