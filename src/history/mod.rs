pub mod snapshot;
pub mod warmup;

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use crate::error::{Error, Result};
use crate::observability::metrics::CHART_REQUESTS;
use crate::observability::tracing::trace_chart_lookup;
use crate::price_infra::cache::TtlCache;
use crate::price_infra::fetcher::{HttpFetcher, UpstreamRequest};
use crate::types::coin::Coin;
use crate::types::timestamp::Clock;
use snapshot::SnapshotStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartGranularity {
    Daily,
    Weekly,
    Monthly,
}

impl ChartGranularity {
    /// Days of history requested upstream. Weekly and monthly charts share
    /// the same window and differ only in which cache they live in.
    pub fn days(&self) -> u32 {
        match self {
            ChartGranularity::Daily => 1,
            ChartGranularity::Weekly => 31,
            ChartGranularity::Monthly => 31,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartGranularity::Daily => "daily",
            ChartGranularity::Weekly => "weekly",
            ChartGranularity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ChartGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CoinGecko market chart: `[unix_ms, value]` pairs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<(i64, f64)>,
    #[serde(default)]
    pub market_caps: Vec<(i64, f64)>,
    #[serde(default)]
    pub total_volumes: Vec<(i64, f64)>,
}

/// Historical chart data.
///
/// Daily charts are persisted once per UTC day and coin in the
/// [`SnapshotStore`]. Weekly and monthly charts live in two independent
/// in-memory caches with a long TTL (24h by default).
pub struct HistoryService {
    fetcher: Arc<dyn HttpFetcher>,
    store: SnapshotStore,
    weekly: TtlCache<MarketChart>,
    monthly: TtlCache<MarketChart>,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl HistoryService {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        store: SnapshotStore,
        weekly: TtlCache<MarketChart>,
        monthly: TtlCache<MarketChart>,
        clock: Arc<dyn Clock>,
        base_url: &str,
    ) -> Self {
        HistoryService {
            fetcher,
            store,
            weekly,
            monthly,
            clock,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn chart(&self, coin: &Coin, granularity: ChartGranularity) -> Result<MarketChart> {
        let span = trace_chart_lookup(&coin.id, granularity.as_str());
        async {
            match granularity {
                ChartGranularity::Daily => self.daily(coin).await,
                ChartGranularity::Weekly => self.cached(&self.weekly, coin, granularity).await,
                ChartGranularity::Monthly => self.cached(&self.monthly, coin, granularity).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Fetches and stores today's daily snapshot unless it already exists.
    /// Returns whether an upstream fetch happened.
    pub async fn ensure_daily_snapshot(&self, coin: &Coin) -> Result<bool> {
        let date = self.clock.now().date_string();
        if self.store.exists(&date, &coin.id).await {
            return Ok(false);
        }

        let chart = self.fetch(coin, ChartGranularity::Daily).await?;
        self.store.save(&date, &coin.id, &chart).await?;
        Ok(true)
    }

    async fn daily(&self, coin: &Coin) -> Result<MarketChart> {
        let date = self.clock.now().date_string();

        if self.store.exists(&date, &coin.id).await {
            match self.store.load(&date, &coin.id).await {
                Ok(chart) => {
                    CHART_REQUESTS.with_label_values(&["daily", "snapshot"]).inc();
                    return Ok(chart);
                }
                Err(e) => tracing::warn!("Unreadable snapshot for {} on {}, refetching: {}", coin.id, date, e),
            }
        }

        let chart = self.fetch(coin, ChartGranularity::Daily).await?;
        if let Err(e) = self.store.save(&date, &coin.id, &chart).await {
            tracing::warn!("Failed to store daily snapshot for {} on {}: {}", coin.id, date, e);
        }
        CHART_REQUESTS.with_label_values(&["daily", "upstream"]).inc();
        Ok(chart)
    }

    async fn cached(
        &self,
        cache: &TtlCache<MarketChart>,
        coin: &Coin,
        granularity: ChartGranularity,
    ) -> Result<MarketChart> {
        if let Some(chart) = cache.get_fresh(&coin.id, self.clock.now()) {
            CHART_REQUESTS.with_label_values(&[granularity.as_str(), "cache"]).inc();
            return Ok(chart);
        }

        let chart = self.fetch(coin, granularity).await?;
        cache.put(&coin.id, chart.clone(), self.clock.now());
        CHART_REQUESTS.with_label_values(&[granularity.as_str(), "upstream"]).inc();
        Ok(chart)
    }

    async fn fetch(&self, coin: &Coin, granularity: ChartGranularity) -> Result<MarketChart> {
        let request = UpstreamRequest::new(format!(
            "{}/api/v3/coins/{}/market_chart?vs_currency=usd&days={}",
            self.base_url,
            coin.id,
            granularity.days()
        ));

        let body = self.fetcher.get_json(request)
            .await
            .map_err(|e| Error::HistoryUnavailable(e.to_string()))?;

        serde_json::from_value(body)
            .map_err(|e| Error::HistoryUnavailable(format!("unexpected chart body for {}: {}", coin.id, e)))
    }
}
