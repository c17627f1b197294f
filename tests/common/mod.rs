use std::path::Path;
use std::sync::Arc;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use coinprice::app::App;
use coinprice::config::loader::AppConfig;
use coinprice::types::timestamp::{ManualClock, Timestamp};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

/// 2023-11-14T22:13:20Z
pub const START_MS: u64 = 1_700_000_000_000;

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
}

/// Every upstream (all four price providers and the chart endpoint) points
/// at the same mock server.
pub fn test_app(server: &MockServer, snapshot_dir: &Path) -> TestApp {
    let mut config = AppConfig::default();
    let uri = server.uri();
    config.providers.binance_url = uri.clone();
    config.providers.coingecko_url = uri.clone();
    config.providers.cryptocompare_url = uri.clone();
    config.providers.coincap_url = uri.clone();
    config.providers.timeout_ms = 2_000;
    config.history.coingecko_url = uri;
    config.history.snapshot_dir = snapshot_dir.to_string_lossy().into_owned();
    config.warmup.enabled = false;

    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(START_MS)));
    let app = App::from_config(&config, clock.clone()).expect("app builds");

    TestApp {
        router: app.router(),
        clock,
    }
}

pub async fn get_text(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, text) = get_text(router, uri).await;
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, body)
}
