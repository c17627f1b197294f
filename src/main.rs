use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use coinprice::app::App;
use coinprice::config::loader::AppConfig;
use coinprice::observability::{metrics, tracing::init_tracing};
use coinprice::types::timestamp::SystemClock;
use coinprice::utils::task_supervisor::TaskSupervisor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("COINPRICE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    init_tracing(&config.logging)?;
    metrics::register_metrics();

    let mut app = App::from_config(&config, Arc::new(SystemClock))?;

    let mut supervisor = TaskSupervisor::new();
    if let Some(warmup) = app.warmup.take() {
        supervisor.spawn("daily_warmup", warmup.run());
    }

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {}", address))?;
    tracing::info!("Server is running on http://{}", address);

    let server = axum::serve(listener, app.router())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    tokio::pin!(server);

    let mut health_check = tokio::time::interval(Duration::from_secs(60));
    loop {
        tokio::select! {
            result = &mut server => {
                result.context("serving HTTP")?;
                break;
            }
            _ = health_check.tick() => {
                // Failures are logged by the supervisor; the server keeps serving
                let _ = supervisor.check_health();
            }
        }
    }

    supervisor.shutdown_all();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
