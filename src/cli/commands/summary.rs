//! Summary command: per-symbol data coverage.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use stockpipe_config::load_config;
use stockpipe_monitor::render_coverage;
use stockpipe_store::BarStore;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let store = BarStore::open(&config.store.url)
        .await
        .context("Failed to open store")?;

    let coverage = store.data_summary().await?;
    if coverage.is_empty() {
        println!("No data in store; run sync first.");
        return Ok(());
    }

    print!("{}", render_coverage(&coverage, Utc::now().date_naive()));
    Ok(())
}
