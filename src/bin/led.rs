use homesim::app_config::AppConfig;
use homesim::simulator::{self, led};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries only the readiness line.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    info!("🪵 Starting the LED simulator v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    info!("✅  Loaded configuration");

    simulator::run(
        &config,
        led::profile(),
        Arc::new(led::LedResource::new()),
        led::notify_style(),
    )
    .await?;

    Ok(())
}
