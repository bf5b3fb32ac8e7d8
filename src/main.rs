use anyhow::Context;
use axum::Router;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

mod client;
mod models;
mod routes;
mod state;
mod utils;

use crate::client::lightwave_client::LightwaveClient;
use crate::state::app_state::AppState;
use crate::utils::conf_helper::init_config_and_bind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("LIGHTWAVE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    // === CONFIG + LISTENER ===
    let (listener, config) = init_config_and_bind()
        .await
        .context("CRITICAL INIT FAILURE")?;

    info!(
        "Viewer initialized on {}:{} for {}",
        config.connection.ip,
        config.connection.port,
        config.endpoint
    );

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let client = LightwaveClient::new(&config.endpoint, timeout)?;
    let state = AppState::new(config, client);

    let app = Router::new()
        .merge(routes::info_routes::health_routes())
        .merge(routes::view_routes::view_routes(state));

    axum::serve(listener, app)
        .await
        .context("server stopped")?;
    Ok(())
}
