use axum::{
    Router,
    routing::get,
    extract::{Path, State, Json},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::alias::AliasResolver;
use crate::error::Error;
use crate::history::{ChartGranularity, HistoryService};
use crate::observability::metrics;
use crate::price_infra::circuit_breaker::ProviderStatus;
use crate::price_infra::facade::ResolutionFacade;
use crate::types::coin::Coin;
use crate::types::price::Price;

pub struct ApiState {
    pub facade: Arc<ResolutionFacade>,
    pub history: Arc<HistoryService>,
    pub aliases: Arc<AliasResolver>,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    let api = Router::new()
        .route("/coin/:coin", get(get_coin_price))
        .route("/daily/:coin", get(get_daily_chart))
        .route("/weekly/:coin", get(get_weekly_chart))
        .route("/monthly/:coin", get(get_monthly_chart));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Maps service errors onto the public error body. Only input errors are
/// described to the caller; everything else is a generic 500.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::MissingCoin => (StatusCode::BAD_REQUEST, "Missing coin parameter"),
            Error::InvalidCoin(_) => (StatusCode::BAD_REQUEST, "Invalid coin parameter"),
            other => {
                tracing::error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong on server")
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

fn resolve_coin(aliases: &AliasResolver, raw: &str) -> Result<Coin, Error> {
    let raw = raw.trim().to_lowercase();
    if raw.is_empty() {
        return Err(Error::MissingCoin);
    }

    aliases.resolve(&raw).ok_or(Error::InvalidCoin(raw))
}

#[derive(Serialize)]
struct PriceResponse {
    coin: String,
    price: Price,
}

async fn get_coin_price(
    State(state): State<Arc<ApiState>>,
    Path(raw): Path<String>,
) -> Result<Json<PriceResponse>, ApiError> {
    let coin = resolve_coin(&state.aliases, &raw)?;
    let price = state.facade.get_price(&coin).await?;

    Ok(Json(PriceResponse {
        coin: coin.id,
        price,
    }))
}

#[derive(Serialize)]
struct ChartResponse {
    coin: String,
    prices: Vec<(i64, f64)>,
}

async fn chart_response(
    state: &ApiState,
    raw: &str,
    granularity: ChartGranularity,
) -> Result<Json<ChartResponse>, ApiError> {
    let coin = resolve_coin(&state.aliases, raw)?;
    let chart = state.history.chart(&coin, granularity).await?;

    Ok(Json(ChartResponse {
        coin: coin.id,
        prices: chart.prices,
    }))
}

async fn get_daily_chart(
    State(state): State<Arc<ApiState>>,
    Path(raw): Path<String>,
) -> Result<Json<ChartResponse>, ApiError> {
    chart_response(&state, &raw, ChartGranularity::Daily).await
}

async fn get_weekly_chart(
    State(state): State<Arc<ApiState>>,
    Path(raw): Path<String>,
) -> Result<Json<ChartResponse>, ApiError> {
    chart_response(&state, &raw, ChartGranularity::Weekly).await
}

async fn get_monthly_chart(
    State(state): State<Arc<ApiState>>,
    Path(raw): Path<String>,
) -> Result<Json<ChartResponse>, ApiError> {
    chart_response(&state, &raw, ChartGranularity::Monthly).await
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    providers: Vec<ProviderStatus>,
}

async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        providers: state.facade.provider_statuses(),
    })
}

async fn get_metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}
