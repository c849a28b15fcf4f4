//! Order command: stationarity check plus ARIMA order grid search.

use std::path::Path;

use anyhow::{Context, Result};
use stockpipe_config::load_config;
use stockpipe_model::{adf_test, CssArimaFitter, OrderSelector};
use stockpipe_store::BarStore;
use tracing::{info, warn};

use crate::cli::OrderArgs;
use crate::cli::commands::resolve_symbols;

pub async fn run(args: OrderArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let symbols = resolve_symbols(&args.symbols, &config.universe);

    let store = BarStore::open(&config.store.url)
        .await
        .context("Failed to open store")?;
    let selector = OrderSelector::new(
        config.arima.max_p,
        config.arima.max_d,
        config.arima.max_q,
        config.arima.default_order,
    );

    for symbol in &symbols {
        let series: Vec<f64> = store
            .load_close_series(symbol)
            .await?
            .into_iter()
            .map(|(_, close)| close)
            .collect();

        if series.is_empty() {
            warn!(%symbol, "no clean data; run clean first");
            continue;
        }

        // Informational only; the grid search runs either way.
        match adf_test(&series, None) {
            Ok(adf) => info!(
                %symbol,
                statistic = adf.statistic,
                p_value = adf.p_value,
                stationary = adf.is_stationary(),
                "ADF test"
            ),
            Err(e) => warn!(%symbol, error = %e, "ADF test failed"),
        }

        let outcome = selector.select(&series, &CssArimaFitter);
        match outcome.aic {
            Some(aic) => println!(
                "{:<8} order {} (AIC {:.2}, {} candidates, {} failed)",
                symbol, outcome.order, aic, outcome.candidates_tried, outcome.candidates_failed
            ),
            None => println!(
                "{:<8} order {} (default; no candidate fitted)",
                symbol, outcome.order
            ),
        }
    }

    Ok(())
}
