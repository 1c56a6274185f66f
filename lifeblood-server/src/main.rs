use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lifeblood_server::{app, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let state = AppState::init(&config)
        .await
        .context("failed to initialize application state")?;

    info!("Starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Serving inspections at http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
