use std::sync::Arc;
use axum::Router;
use crate::alias::AliasResolver;
use crate::api::rest::{create_router, ApiState};
use crate::config::loader::AppConfig;
use crate::error::Result;
use crate::history::snapshot::SnapshotStore;
use crate::history::warmup::DailyWarmup;
use crate::history::HistoryService;
use crate::price_infra::cache::{PriceCache, TtlCache};
use crate::price_infra::circuit_breaker::ProviderCircuitBreaker;
use crate::price_infra::facade::ResolutionFacade;
use crate::price_infra::fetcher::{HttpFetcher, ReqwestFetcher};
use crate::price_infra::registry::ProviderRegistry;
use crate::price_infra::resolver::PriceResolver;
use crate::types::timestamp::Clock;

/// Everything the server needs, wired from configuration.
pub struct App {
    pub state: Arc<ApiState>,
    pub warmup: Option<DailyWarmup>,
}

impl App {
    pub fn from_config(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let fetcher: Arc<dyn HttpFetcher> = Arc::new(ReqwestFetcher::new(config.providers.timeout())?);
        Ok(Self::with_fetcher(config, clock, fetcher))
    }

    pub fn with_fetcher(config: &AppConfig, clock: Arc<dyn Clock>, fetcher: Arc<dyn HttpFetcher>) -> Self {
        let aliases = Arc::new(AliasResolver::builtin().with_extra(&config.aliases));

        let resolver = PriceResolver::new(
            ProviderRegistry::from_config(&config.providers),
            Arc::new(ProviderCircuitBreaker::new(config.providers.cooldown())),
            fetcher.clone(),
            clock.clone(),
        );
        let cache = Arc::new(
            PriceCache::new(config.cache.price_ttl()).with_max_entries(config.cache.max_entries),
        );
        let facade = Arc::new(ResolutionFacade::new(cache, resolver, clock.clone()));

        let history_cache = || {
            TtlCache::new(config.cache.history_ttl()).with_max_entries(config.cache.max_entries)
        };
        let history = Arc::new(HistoryService::new(
            fetcher,
            SnapshotStore::new(&config.history.snapshot_dir),
            history_cache(),
            history_cache(),
            clock.clone(),
            &config.history.coingecko_url,
        ));

        let warmup = config.warmup.enabled.then(|| {
            DailyWarmup::new(
                history.clone(),
                aliases.clone(),
                clock,
                config.warmup.coins.clone(),
                config.warmup.spacing(),
                config.warmup.check_interval(),
            )
        });

        App {
            state: Arc::new(ApiState {
                facade,
                history,
                aliases,
            }),
            warmup,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }
}
