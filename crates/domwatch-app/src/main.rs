use anyhow::{Context, Result};
use tracing::{error, info};

use domwatch_lib::application::bootstrap::CONFIG_ENV_VAR;
use domwatch_lib::{bootstrap, resolve_config_path};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = resolve_config_path(
        std::env::args().nth(1),
        std::env::var(CONFIG_ENV_VAR).ok(),
    );

    let app = bootstrap(&config_path)
        .await
        .with_context(|| format!("Failed to start with config {}", config_path.display()))?;

    app.scheduler.start().await?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        thresholds = ?app.config.monitor.alert_days.as_slice(),
        "domwatch running, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!("Shutting down");
    if let Err(e) = app.scheduler.stop().await {
        error!("Scheduler shutdown failed: {:#}", e);
    }

    Ok(())
}
