use std::sync::Once;
use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Provider metrics
    pub static ref PROVIDER_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "provider_requests_total",
            "Upstream price provider attempts by outcome"
        ),
        &["provider", "outcome"]
    ).unwrap();

    // Price cache metrics
    pub static ref PRICE_CACHE_HITS: IntCounter = IntCounter::new(
        "price_cache_hits_total",
        "Price lookups served from cache"
    ).unwrap();

    pub static ref PRICE_CACHE_MISSES: IntCounter = IntCounter::new(
        "price_cache_misses_total",
        "Price lookups that went upstream"
    ).unwrap();

    pub static ref RESOLUTION_FAILURES: IntCounter = IntCounter::new(
        "price_resolution_failures_total",
        "Price lookups where every provider was unavailable"
    ).unwrap();

    // Chart metrics
    pub static ref CHART_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "chart_requests_total",
            "Chart lookups by granularity and where they were served from"
        ),
        &["granularity", "source"]
    ).unwrap();

    // Latency metrics
    pub static ref RESOLUTION_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "price_resolution_latency_seconds",
            "Time spent resolving a price upstream"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])
    ).unwrap();
}

static REGISTER: Once = Once::new();

pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY.register(Box::new(PROVIDER_REQUESTS.clone())).unwrap();
        REGISTRY.register(Box::new(PRICE_CACHE_HITS.clone())).unwrap();
        REGISTRY.register(Box::new(PRICE_CACHE_MISSES.clone())).unwrap();
        REGISTRY.register(Box::new(RESOLUTION_FAILURES.clone())).unwrap();
        REGISTRY.register(Box::new(CHART_REQUESTS.clone())).unwrap();
        REGISTRY.register(Box::new(RESOLUTION_LATENCY.clone())).unwrap();
    });
}

/// Prometheus text exposition of everything in [`REGISTRY`].
pub fn render() -> String {
    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
