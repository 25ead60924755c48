use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use parkspot::config::{LoggingConfig, ParkspotConfig};
use parkspot::web;

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parkspot={},tower_http=info", logging.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // optional explicit config file as the only argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        ParkspotConfig::load_from_path(config_path).context("Failed to load configuration")?;

    init_logging(&config.logging);
    info!("ParkSpot {} starting", parkspot::VERSION);

    web::run(&config).await
}
