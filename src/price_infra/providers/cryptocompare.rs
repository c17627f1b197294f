use serde_json::Value;
use crate::price_infra::fetcher::UpstreamRequest;
use crate::price_infra::providers::{trim_base, PriceProvider};
use crate::types::coin::Coin;
use crate::types::price::Price;

pub struct CryptoCompareProvider {
    base_url: String,
}

impl CryptoCompareProvider {
    pub fn new(base_url: &str) -> Self {
        CryptoCompareProvider {
            base_url: trim_base(base_url),
        }
    }
}

impl PriceProvider for CryptoCompareProvider {
    fn name(&self) -> &str {
        "cryptocompare"
    }

    fn build_request(&self, coin: &Coin) -> UpstreamRequest {
        UpstreamRequest::new(format!(
            "{}/data/price?fsym={}&tsyms=USD",
            self.base_url,
            coin.symbol.to_uppercase()
        ))
    }

    // {"USD":43210.5}; unknown symbols come back as {"Response":"Error",...} with a 200
    fn extract_price(&self, _coin: &Coin, body: &Value) -> Option<Price> {
        body.get("USD").and_then(Price::from_json)
    }
}
