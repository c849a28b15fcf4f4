//! Watch command: continuous sync batches with clean shutdown.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use stockpipe_config::load_config;
use stockpipe_data::StooqFeed;
use stockpipe_store::BarStore;
use stockpipe_sync::{run_continuous, SyncController};
use tokio::sync::watch;
use tracing::info;

use crate::cli::WatchArgs;
use crate::cli::commands::resolve_symbols;

pub async fn run(args: WatchArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let symbols = resolve_symbols(&[], &config.universe);
    let interval = args
        .interval
        .map(|hours| Duration::from_secs(hours * 3600))
        .unwrap_or_else(|| config.sync.interval());

    let store = Arc::new(
        BarStore::open(&config.store.url)
            .await
            .context("Failed to open store")?,
    );
    let controller = SyncController::new(
        store,
        Arc::new(StooqFeed::new()),
        config.sync.to_sync_config(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; stopping after the current batch");
            let _ = shutdown_tx.send(true);
        }
    });

    run_continuous(&controller, &symbols, interval, shutdown_rx).await;
    Ok(())
}
