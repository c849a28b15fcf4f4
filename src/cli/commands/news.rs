//! News import command.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use stockpipe_config::load_config;
use stockpipe_data::{CsvNewsFeed, StooqFeed};
use stockpipe_store::BarStore;
use stockpipe_sync::SyncController;
use tracing::warn;

use crate::cli::NewsArgs;
use crate::cli::commands::resolve_symbols;

pub async fn run(args: NewsArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let symbols = resolve_symbols(&args.symbols, &config.universe);

    let store = Arc::new(
        BarStore::open(&config.store.url)
            .await
            .context("Failed to open store")?,
    );
    let news = CsvNewsFeed::new(&args.file).context("Failed to open headlines file")?;
    let controller =
        SyncController::new(store, Arc::new(StooqFeed::new()), config.sync.to_sync_config());

    let mut imported = 0usize;
    let mut failed = 0usize;
    for symbol in &symbols {
        match controller.sync_news_symbol(&news, symbol).await {
            Ok(rows) => {
                if rows > 0 {
                    println!("{:<8} {} headlines", symbol, rows);
                }
                imported += rows;
            }
            Err(e) => {
                warn!(%symbol, error = %e, "news import failed");
                failed += 1;
            }
        }
    }

    println!("\n{} headlines imported, {} symbols failed", imported, failed);
    Ok(())
}
