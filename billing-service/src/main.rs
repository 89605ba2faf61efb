//! billing-service binary

use anyhow::Context;
use billing_service::config::Config;
use billing_service::state::AppState;
use billing_service::{api, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("configuration: {e}"))?;

    // Guard must outlive the server so buffered file logs are flushed
    let _log_guard = logger::init(config.log_json, config.log_dir.as_deref())?;

    tracing::info!("Starting billing-service (env: {})", config.environment);

    let (state, pool) = AppState::new(&config)
        .await
        .map_err(|e| anyhow::anyhow!("initialising state: {e}"))?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("billing-service HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    pool.close().await;
    tracing::info!("billing-service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
