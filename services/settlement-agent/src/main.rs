use anyhow::Context;
use settlement_agent::{app_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use zk_settlement_core::{logging, AgentConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AgentConfig::load()?;
    logging::init_from_config(&config.logging);

    let bind_addr = config.bind_addr();
    let state = AppState::from_config(config)?;
    let app = app_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!("Settlement agent listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Settlement agent stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
