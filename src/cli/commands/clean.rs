//! Clean command: validate stored bars and persist engineered features.

use std::path::Path;

use anyhow::{Context, Result};
use stockpipe_config::load_config;
use stockpipe_core::RawBar;
use stockpipe_data::clean_bars;
use stockpipe_features::FeatureEngine;
use stockpipe_store::BarStore;
use tracing::{info, warn};

use crate::cli::CleanArgs;
use crate::cli::commands::resolve_symbols;

pub async fn run(args: CleanArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let symbols = resolve_symbols(&args.symbols, &config.universe);

    let store = BarStore::open(&config.store.url)
        .await
        .context("Failed to open store")?;
    let engine = FeatureEngine::new(config.features.clone());

    let mut processed = 0usize;
    for symbol in &symbols {
        if !args.force && store.has_clean_data(symbol).await? {
            info!(%symbol, "clean data already exists; use --force to re-process");
            continue;
        }

        let stored = store.load_bars(symbol).await?;
        if stored.is_empty() {
            warn!(%symbol, "no stored bars; run sync first");
            continue;
        }

        // Re-validating stored rows is a no-op on healthy data and repairs
        // anything written before an invariant tightened.
        let raw: Vec<RawBar> = stored
            .iter()
            .map(|b| {
                RawBar::complete(b.symbol.clone(), b.date, b.open, b.high, b.low, b.close, b.volume)
            })
            .collect();
        let (bars, report) = clean_bars(raw);
        if report.total_dropped() > 0 {
            info!(%symbol, dropped = report.total_dropped(), "dropped stored rows");
        }
        if bars.is_empty() {
            warn!(%symbol, "no valid rows after cleaning; skipping");
            continue;
        }

        let clean = engine.compute(&bars);
        let rows = store.upsert_clean_bars(&clean).await?;
        info!(%symbol, rows, "features persisted");
        println!("{:<8} {} clean rows", symbol, rows);
        processed += 1;
    }

    println!("\n{}/{} symbols processed", processed, symbols.len());
    Ok(())
}
