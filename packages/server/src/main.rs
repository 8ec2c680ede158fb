use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use stenoclass_server::config::AppConfig;
use stenoclass_server::database::init_db;
use stenoclass_server::state::AppState;
use stenoclass_server::{build_router, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState { db, config });

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
