use std::sync::Arc;
use tracing::Instrument;
use crate::error::Result;
use crate::observability::metrics::{
    PRICE_CACHE_HITS, PRICE_CACHE_MISSES, RESOLUTION_FAILURES, RESOLUTION_LATENCY,
};
use crate::observability::tracing::trace_price_resolution;
use crate::price_infra::cache::PriceCache;
use crate::price_infra::circuit_breaker::ProviderStatus;
use crate::price_infra::resolver::PriceResolver;
use crate::types::coin::Coin;
use crate::types::price::Price;
use crate::types::timestamp::Clock;

/// Entry point for price lookups: fresh cache hit, else resolve and store.
///
/// A failed resolution is returned as-is. The cache is left untouched and a
/// stale entry is never served in its place.
pub struct ResolutionFacade {
    cache: Arc<PriceCache>,
    resolver: PriceResolver,
    clock: Arc<dyn Clock>,
}

impl ResolutionFacade {
    pub fn new(cache: Arc<PriceCache>, resolver: PriceResolver, clock: Arc<dyn Clock>) -> Self {
        ResolutionFacade {
            cache,
            resolver,
            clock,
        }
    }

    pub fn cache(&self) -> &Arc<PriceCache> {
        &self.cache
    }

    pub async fn get_price(&self, coin: &Coin) -> Result<Price> {
        if let Some(price) = self.cache.get_fresh(&coin.id, self.clock.now()) {
            PRICE_CACHE_HITS.inc();
            tracing::debug!("Cache hit for {}", coin.id);
            return Ok(price);
        }
        PRICE_CACHE_MISSES.inc();

        let timer = RESOLUTION_LATENCY.start_timer();
        let resolved = self.resolver.resolve(coin)
            .instrument(trace_price_resolution(&coin.id))
            .await;
        timer.observe_duration();

        let price = resolved.inspect_err(|e| {
            RESOLUTION_FAILURES.inc();
            tracing::error!("{}", e);
        })?;

        self.cache.put(&coin.id, price, self.clock.now());
        Ok(price)
    }

    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        let names = self.resolver.registry().names();
        self.resolver.breaker().snapshot(names.iter().map(String::as_str))
    }
}
