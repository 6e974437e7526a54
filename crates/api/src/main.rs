//! Burned-Area Prediction Server - Main Entry Point

use api::{init_logging, load_config, run_server};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    init_logging(&config.log_level, config.log_json)?;

    info!("=== Firecast v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Model artifact: {}", config.artifact_path.display());

    run_server(config).await?;

    Ok(())
}
