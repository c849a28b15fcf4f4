//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use stockpipe_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Store: {}", config.store.url);
            println!("Universe: {} symbols", config.universe.len());
            println!("Max lookback: {} days", config.sync.max_lookback_days);
            println!("Sync buffer: {} days", config.sync.buffer_days);
            println!("Update interval: {}h", config.sync.update_interval_hours);
            println!("Label horizon: {} days", config.labels.horizon);
            println!("Label threshold: {}%", config.labels.threshold_pct);
            println!("Default ARIMA order: {}", config.arima.default_order);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
