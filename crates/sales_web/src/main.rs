//! SalesCast web service entry point

use anyhow::{Context, Result};
use clap::Parser;
use salescast_core::load_model;
use salescast_web::{start_server, AppState, Cli, ServerConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("Starting SalesCast v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = ServerConfig::from_cli(&cli).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Loading model from {}", config.model_path.display());
    let model = load_model(&config.model_path)
        .map_err(|e| {
            error!("{}", e);
            e
        })
        .context("cannot serve predictions without a model")?;

    let state = AppState::new(model);
    start_server(state, &config.bind_addr()).await?;

    info!("SalesCast stopped");
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
