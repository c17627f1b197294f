use serde_json::Value;
use crate::price_infra::fetcher::UpstreamRequest;
use crate::price_infra::providers::{trim_base, PriceProvider};
use crate::types::coin::Coin;
use crate::types::price::Price;

pub struct CoinCapProvider {
    base_url: String,
}

impl CoinCapProvider {
    pub fn new(base_url: &str) -> Self {
        CoinCapProvider {
            base_url: trim_base(base_url),
        }
    }
}

impl PriceProvider for CoinCapProvider {
    fn name(&self) -> &str {
        "coincap"
    }

    fn build_request(&self, coin: &Coin) -> UpstreamRequest {
        UpstreamRequest::new(format!("{}/v2/assets/{}", self.base_url, coin.id))
    }

    // {"data":{"id":"bitcoin","priceUsd":"43210.5012345"},"timestamp":...}
    fn extract_price(&self, _coin: &Coin, body: &Value) -> Option<Price> {
        body.get("data")
            .and_then(|asset| asset.get("priceUsd"))
            .and_then(Price::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_is_nested_under_data() {
        let provider = CoinCapProvider::new("https://api.coincap.io");
        let coin = Coin::new("bitcoin", "btc");

        assert_eq!(provider.build_request(&coin).url, "https://api.coincap.io/v2/assets/bitcoin");
        assert_eq!(
            provider.extract_price(&coin, &json!({"data": {"priceUsd": "43210.5012345"}}))
                .map(|p| p.to_string()),
            Some("43210.5012345".to_string())
        );
        assert_eq!(provider.extract_price(&coin, &json!({"data": null})), None);
        assert_eq!(provider.extract_price(&coin, &json!({"error": "bitcoin2 not found"})), None);
    }
}
