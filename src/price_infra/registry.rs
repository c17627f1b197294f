use std::sync::Arc;
use crate::config::ProvidersConfig;
use crate::price_infra::providers::{
    BinanceProvider, CoinCapProvider, CoinGeckoProvider, CryptoCompareProvider, PriceProvider,
};

/// Fixed, ordered list of providers. Position in the list is fallback
/// priority.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn PriceProvider>>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn PriceProvider>>) -> Self {
        ProviderRegistry { providers }
    }

    /// binance → coingecko → cryptocompare → coincap
    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self::new(vec![
            Arc::new(BinanceProvider::new(&config.binance_url)),
            Arc::new(CoinGeckoProvider::new(&config.coingecko_url)),
            Arc::new(CryptoCompareProvider::new(&config.cryptocompare_url)),
            Arc::new(CoinCapProvider::new(&config.coincap_url)),
        ])
    }

    pub fn providers(&self) -> &[Arc<dyn PriceProvider>] {
        &self.providers
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
