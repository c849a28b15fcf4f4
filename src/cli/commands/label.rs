//! Label command: build forward-return targets and report class balance.

use std::path::Path;

use anyhow::{Context, Result};
use stockpipe_config::load_config;
use stockpipe_core::RawBar;
use stockpipe_data::clean_bars;
use stockpipe_features::FeatureEngine;
use stockpipe_model::{build_labels, class_counts, ensure_stratifiable, TrainingSet};
use stockpipe_store::BarStore;
use tracing::warn;

use crate::cli::LabelArgs;
use crate::cli::commands::resolve_symbols;

pub async fn run(args: LabelArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let symbols = resolve_symbols(&args.symbols, &config.universe);

    let mut label_config = config.labels;
    if let Some(horizon) = args.horizon {
        label_config.horizon = horizon;
    }
    if let Some(threshold) = args.threshold {
        label_config.threshold_pct = threshold;
    }

    let store = BarStore::open(&config.store.url)
        .await
        .context("Failed to open store")?;
    let engine = FeatureEngine::new(config.features.clone());

    for symbol in &symbols {
        let stored = store.load_bars(symbol).await?;
        if stored.is_empty() {
            warn!(%symbol, "no stored bars; run sync first");
            continue;
        }

        let raw: Vec<RawBar> = stored
            .iter()
            .map(|b| {
                RawBar::complete(b.symbol.clone(), b.date, b.open, b.high, b.low, b.close, b.volume)
            })
            .collect();
        let (bars, _) = clean_bars(raw);
        let clean = engine.compute(&bars);

        let labels = match build_labels(&clean, &label_config) {
            Ok(labels) => labels,
            Err(e) => {
                warn!(%symbol, error = %e, "labeling failed");
                continue;
            }
        };

        let (down, up) = class_counts(&labels);
        let stratifiable = match ensure_stratifiable(&labels) {
            Ok(()) => "ok",
            Err(e) => {
                warn!(%symbol, error = %e, "label set is degenerate");
                "single-class"
            }
        };

        let sentiment_map = store
            .daily_sentiment(symbol)
            .await?
            .into_iter()
            .map(|d| (d.date, d))
            .collect();
        let trainable = match TrainingSet::assemble(&labels, &sentiment_map) {
            Ok(set) => set.len(),
            Err(_) => 0,
        };

        println!(
            "{:<8} {} labeled rows ({} up / {} down, split: {}), {} trainable",
            symbol,
            labels.len(),
            up,
            down,
            stratifiable,
            trainable
        );
    }

    Ok(())
}
