//! ExoHunt Inference API - Main Entry Point

use api::config::AppConfig;
use api::{init_logging, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.logging);

    info!("=== ExoHunt Inference API v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Model artifacts: {}", config.artifacts.location().source.describe());

    run_server(config).await?;

    Ok(())
}
