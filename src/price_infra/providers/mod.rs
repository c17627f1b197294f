pub mod binance;
pub mod coincap;
pub mod coingecko;
pub mod cryptocompare;

use serde_json::Value;
use crate::price_infra::fetcher::UpstreamRequest;
use crate::types::coin::Coin;
use crate::types::price::Price;

/// An upstream price source: how to ask it, and where its answer lives.
///
/// `extract_price` never fails. A body without a usable price for the coin
/// is reported as `None` and the provider is not penalised for it.
pub trait PriceProvider: Send + Sync {
    fn name(&self) -> &str;
    fn build_request(&self, coin: &Coin) -> UpstreamRequest;
    fn extract_price(&self, coin: &Coin, body: &Value) -> Option<Price>;
}

pub use binance::BinanceProvider;
pub use coincap::CoinCapProvider;
pub use coingecko::CoinGeckoProvider;
pub use cryptocompare::CryptoCompareProvider;

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
