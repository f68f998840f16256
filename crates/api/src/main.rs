//! Statuspage Manager - Main Entry Point

use api::{init_logging, init_metrics, run_server, AppState, Settings};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== Statuspage Manager v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Unable to load configuration");
            return Err(e.into());
        }
    };
    info!(settings = ?settings, "Configuration loaded");

    let metrics = init_metrics()?;
    let state = Arc::new(AppState::from_settings(&settings, metrics)?);

    run_server(&settings.listen_addr, state).await?;

    Ok(())
}
