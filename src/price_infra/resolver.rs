use std::sync::Arc;
use crate::error::{Error, Result};
use crate::observability::metrics::PROVIDER_REQUESTS;
use crate::price_infra::circuit_breaker::ProviderCircuitBreaker;
use crate::price_infra::fetcher::HttpFetcher;
use crate::price_infra::providers::PriceProvider;
use crate::price_infra::registry::ProviderRegistry;
use crate::types::coin::Coin;
use crate::types::price::Price;
use crate::types::timestamp::Clock;

/// Ordered fallback over the registry.
///
/// Providers are tried in registry order, skipping those the breaker holds
/// open. The first extractable price wins. A transport failure disables the
/// provider; a well-formed answer without a price for the coin does not.
pub struct PriceResolver {
    registry: ProviderRegistry,
    breaker: Arc<ProviderCircuitBreaker>,
    fetcher: Arc<dyn HttpFetcher>,
    clock: Arc<dyn Clock>,
}

impl PriceResolver {
    pub fn new(
        registry: ProviderRegistry,
        breaker: Arc<ProviderCircuitBreaker>,
        fetcher: Arc<dyn HttpFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        PriceResolver {
            registry,
            breaker,
            fetcher,
            clock,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn breaker(&self) -> &Arc<ProviderCircuitBreaker> {
        &self.breaker
    }

    pub async fn resolve(&self, coin: &Coin) -> Result<Price> {
        for provider in self.registry.providers() {
            let name = provider.name();

            if !self.breaker.is_available(name, self.clock.now()) {
                tracing::debug!("Skipping {} for {}: provider disabled", name, coin.id);
                PROVIDER_REQUESTS.with_label_values(&[name, "skipped"]).inc();
                continue;
            }

            match self.attempt(provider.as_ref(), coin).await {
                Ok(price) => {
                    self.breaker.record_success(name);
                    PROVIDER_REQUESTS.with_label_values(&[name, "success"]).inc();
                    tracing::debug!("Got price for {} from {}: {}", coin.id, name, price);
                    return Ok(price);
                }
                Err(e) if e.penalizes_provider() => {
                    self.breaker.record_failure(name, self.clock.now());
                    PROVIDER_REQUESTS.with_label_values(&[name, "failure"]).inc();
                    tracing::warn!("Error fetching {} from {}: {}", coin.id, name, e);
                }
                Err(e) => {
                    PROVIDER_REQUESTS.with_label_values(&[name, "no_data"]).inc();
                    tracing::warn!("{}", e);
                }
            }
        }

        Err(Error::NoProviderAvailable {
            coin: coin.id.clone(),
        })
    }

    async fn attempt(&self, provider: &dyn PriceProvider, coin: &Coin) -> Result<Price> {
        let request = provider.build_request(coin);
        let body = self.fetcher.get_json(request)
            .await
            .map_err(|e| Error::ProviderTransport {
                provider: provider.name().to_string(),
                reason: e.to_string(),
            })?;

        provider.extract_price(coin, &body).ok_or_else(|| Error::ProviderNoData {
            provider: provider.name().to_string(),
            coin: coin.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use crate::config::ProvidersConfig;
    use crate::price_infra::fetcher::testing::{Scripted, ScriptedFetcher};
    use crate::types::timestamp::{ManualClock, Timestamp};

    const BINANCE: &str = "/api/v3/ticker/price";
    const COINGECKO: &str = "/api/v3/simple/price";
    const CRYPTOCOMPARE: &str = "/data/price";
    const COINCAP: &str = "/v2/assets/";

    struct Harness {
        resolver: PriceResolver,
        fetcher: Arc<ScriptedFetcher>,
        breaker: Arc<ProviderCircuitBreaker>,
        clock: Arc<ManualClock>,
    }

    fn harness() -> Harness {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let breaker = Arc::new(ProviderCircuitBreaker::new(Duration::from_secs(1200)));
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(1_700_000_000_000)));
        let resolver = PriceResolver::new(
            ProviderRegistry::from_config(&ProvidersConfig::default()),
            breaker.clone(),
            fetcher.clone(),
            clock.clone(),
        );
        Harness { resolver, fetcher, breaker, clock }
    }

    fn bitcoin() -> Coin {
        Coin::new("bitcoin", "btc")
    }

    #[tokio::test]
    async fn first_provider_success_short_circuits() {
        let h = harness();
        h.fetcher.respond(BINANCE, Scripted::Json(json!({"price": "43210.50"})));
        h.fetcher.respond(COINGECKO, Scripted::Json(json!({"bitcoin": {"usd": 1}})));

        let price = h.resolver.resolve(&bitcoin()).await.expect("price resolves");

        assert_eq!(price.to_string(), "43210.50");
        assert_eq!(h.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn transport_error_falls_back_and_disables_only_failed_provider() {
        let h = harness();
        h.fetcher.respond(BINANCE, Scripted::Fail("HTTP status server error (500)"));
        h.fetcher.respond(COINGECKO, Scripted::Json(json!({"bitcoin": {"usd": 43000.25}})));

        let price = h.resolver.resolve(&bitcoin()).await.expect("price resolves");

        assert_eq!(price.as_decimal(), dec!(43000.25));
        assert!(h.breaker.state("binance").is_disabled());
        assert!(!h.breaker.state("coingecko").is_disabled());
    }

    #[tokio::test]
    async fn disabled_provider_is_skipped_until_cooldown_expires() {
        let h = harness();
        h.fetcher.respond(BINANCE, Scripted::Fail("timeout"));
        h.fetcher.respond(COINGECKO, Scripted::Json(json!({"bitcoin": {"usd": 2}})));
        h.resolver.resolve(&bitcoin()).await.unwrap();

        // Binance recovers, but stays benched for the cooldown
        h.fetcher.respond(BINANCE, Scripted::Json(json!({"price": "1"})));
        h.fetcher.reset_calls();
        h.clock.advance(Duration::from_secs(1199));
        let price = h.resolver.resolve(&bitcoin()).await.unwrap();
        assert_eq!(price.as_decimal(), dec!(2));
        assert_eq!(h.fetcher.calls_to(BINANCE), 0);

        h.clock.advance(Duration::from_secs(1));
        let price = h.resolver.resolve(&bitcoin()).await.unwrap();
        assert_eq!(price.as_decimal(), dec!(1));
        assert_eq!(h.fetcher.calls_to(BINANCE), 1);
        assert!(!h.breaker.state("binance").is_disabled());
    }

    #[tokio::test]
    async fn missing_price_is_not_penalised() {
        let h = harness();
        h.fetcher.respond(BINANCE, Scripted::Json(json!({"code": -1121, "msg": "Invalid symbol."})));
        h.fetcher.respond(COINGECKO, Scripted::Json(json!({"bitcoin": {"usd": 5}})));

        h.resolver.resolve(&bitcoin()).await.unwrap();
        assert!(!h.breaker.state("binance").is_disabled());

        h.fetcher.reset_calls();
        h.resolver.resolve(&bitcoin()).await.unwrap();
        assert_eq!(h.fetcher.calls_to(BINANCE), 1);
    }

    #[tokio::test]
    async fn later_providers_are_reached_in_order() {
        let h = harness();
        h.fetcher.respond(BINANCE, Scripted::Fail("dns error"));
        h.fetcher.respond(COINGECKO, Scripted::Json(json!({})));
        h.fetcher.respond(CRYPTOCOMPARE, Scripted::Fail("429 Too Many Requests"));
        h.fetcher.respond(COINCAP, Scripted::Json(json!({"data": {"priceUsd": "43210.5012"}})));

        let price = h.resolver.resolve(&bitcoin()).await.unwrap();

        assert_eq!(price.to_string(), "43210.5012");
        let calls = h.fetcher.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[0].contains(BINANCE));
        assert!(calls[1].contains(COINGECKO));
        assert!(calls[2].contains(CRYPTOCOMPARE));
        assert!(calls[3].contains(COINCAP));
    }

    #[tokio::test]
    async fn exhausted_providers_yield_no_provider_available() {
        let h = harness();
        h.fetcher.respond(BINANCE, Scripted::Fail("refused"));
        h.fetcher.respond(COINGECKO, Scripted::Fail("refused"));
        h.fetcher.respond(CRYPTOCOMPARE, Scripted::Json(json!({"Response": "Error"})));
        h.fetcher.respond(COINCAP, Scripted::Fail("refused"));

        let err = h.resolver.resolve(&bitcoin()).await.expect_err("nothing available");
        assert!(matches!(err, Error::NoProviderAvailable { ref coin } if coin == "bitcoin"));

        // With three providers benched only cryptocompare is tried next time
        h.fetcher.reset_calls();
        let err = h.resolver.resolve(&bitcoin()).await.expect_err("still nothing");
        assert!(matches!(err, Error::NoProviderAvailable { .. }));
        assert_eq!(h.fetcher.calls().len(), 1);
        assert_eq!(h.fetcher.calls_to(CRYPTOCOMPARE), 1);
    }
}
