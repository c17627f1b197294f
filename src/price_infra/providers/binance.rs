use serde_json::Value;
use crate::price_infra::fetcher::UpstreamRequest;
use crate::price_infra::providers::{trim_base, PriceProvider};
use crate::types::coin::Coin;
use crate::types::price::Price;

/// Binance spot ticker, quoted against USDT.
pub struct BinanceProvider {
    base_url: String,
}

impl BinanceProvider {
    pub fn new(base_url: &str) -> Self {
        BinanceProvider {
            base_url: trim_base(base_url),
        }
    }
}

impl PriceProvider for BinanceProvider {
    fn name(&self) -> &str {
        "binance"
    }

    fn build_request(&self, coin: &Coin) -> UpstreamRequest {
        UpstreamRequest::new(format!(
            "{}/api/v3/ticker/price?symbol={}USDT",
            self.base_url,
            coin.symbol.to_uppercase()
        ))
    }

    // {"symbol":"BTCUSDT","price":"43210.50000000"}
    fn extract_price(&self, _coin: &Coin, body: &Value) -> Option<Price> {
        body.get("price").and_then(Price::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_upper_case_usdt_pair() {
        let provider = BinanceProvider::new("https://api.binance.com/");
        let request = provider.build_request(&Coin::new("bitcoin", "btc"));

        assert_eq!(request.url, "https://api.binance.com/api/v3/ticker/price?symbol=BTCUSDT");
    }

    #[test]
    fn price_is_read_from_ticker_body() {
        let provider = BinanceProvider::new("https://api.binance.com");
        let coin = Coin::new("bitcoin", "btc");

        let price = provider.extract_price(&coin, &json!({"symbol": "BTCUSDT", "price": "43210.50"}));
        assert_eq!(price.map(|p| p.to_string()), Some("43210.50".to_string()));

        assert_eq!(provider.extract_price(&coin, &json!({"code": -1121, "msg": "Invalid symbol."})), None);
    }
}
