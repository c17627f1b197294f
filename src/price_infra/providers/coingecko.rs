use serde_json::Value;
use crate::price_infra::fetcher::UpstreamRequest;
use crate::price_infra::providers::{trim_base, PriceProvider};
use crate::types::coin::Coin;
use crate::types::price::Price;

pub struct CoinGeckoProvider {
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoProvider {
            base_url: trim_base(base_url),
        }
    }
}

impl PriceProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    fn build_request(&self, coin: &Coin) -> UpstreamRequest {
        UpstreamRequest::new(format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base_url, coin.id
        ))
    }

    // {"bitcoin":{"usd":43210.5}}, or {} for an id CoinGecko doesn't know
    fn extract_price(&self, coin: &Coin, body: &Value) -> Option<Price> {
        body.get(&coin.id)
            .and_then(|quote| quote.get("usd"))
            .and_then(Price::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_is_keyed_by_coin_id() {
        let provider = CoinGeckoProvider::new("https://api.coingecko.com");
        let coin = Coin::new("bitcoin", "btc");

        assert_eq!(
            provider.build_request(&coin).url,
            "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd"
        );
        assert!(provider.extract_price(&coin, &json!({"bitcoin": {"usd": 43210.5}})).is_some());
        assert_eq!(provider.extract_price(&coin, &json!({})), None);
        assert_eq!(provider.extract_price(&coin, &json!({"ethereum": {"usd": 2000}})), None);
    }
}
