//! Sync command implementation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use stockpipe_config::load_config;
use stockpipe_core::PriceFeed;
use stockpipe_data::{CsvPriceFeed, StooqFeed};
use stockpipe_monitor::render_batch_report;
use stockpipe_store::BarStore;
use stockpipe_sync::SyncController;
use tracing::info;

use crate::cli::SyncArgs;
use crate::cli::commands::resolve_symbols;

pub async fn run(args: SyncArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let symbols = resolve_symbols(&args.symbols, &config.universe);

    let store = Arc::new(
        BarStore::open(&config.store.url)
            .await
            .context("Failed to open store")?,
    );

    let feed: Arc<dyn PriceFeed> = match &args.data {
        Some(dir) => Arc::new(CsvPriceFeed::new(dir).context("Failed to open CSV data dir")?),
        None => Arc::new(StooqFeed::new()),
    };
    info!(feed = feed.name(), symbols = symbols.len(), "starting sync");

    let controller = SyncController::new(store, feed, config.sync.to_sync_config());
    let report = controller
        .sync_all(&symbols, args.force, Utc::now().date_naive())
        .await;

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", render_batch_report(&report)),
    }
    Ok(())
}
