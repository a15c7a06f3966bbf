//! Vehicle Catalogue - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config)?;

    info!("=== Vehicle Catalogue v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Seeding store from {}", config.vehicles_file.display());

    run_server(&config).await?;

    Ok(())
}
