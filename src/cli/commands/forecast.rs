//! Forecast command: fit the chosen order and persist predictions.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use stockpipe_config::load_config;
use stockpipe_core::Prediction;
use stockpipe_model::{ArimaFitter, CssArimaFitter, OrderSelector};
use stockpipe_store::BarStore;
use tracing::warn;

use crate::cli::ForecastArgs;
use crate::cli::commands::resolve_symbols;

pub async fn run(args: ForecastArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let symbols = resolve_symbols(&args.symbols, &config.universe);
    let days = args.days.unwrap_or(config.arima.forecast_days);

    let store = BarStore::open(&config.store.url)
        .await
        .context("Failed to open store")?;

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

        let order = if args.auto_order {
            let selector = OrderSelector::new(
                config.arima.max_p,
                config.arima.max_d,
                config.arima.max_q,
                config.arima.default_order,
            );
            selector.select(&series, &CssArimaFitter).order
        } else {
            config.arima.default_order
        };

        let fit = match CssArimaFitter.fit(&series, order) {
            Ok(fit) => fit,
            Err(e) => {
                warn!(%symbol, %order, error = %e, "fit failed; skipping symbol");
                continue;
            }
        };

        let today = Utc::now().date_naive();
        let predictions: Vec<Prediction> = fit
            .forecast(days)
            .into_iter()
            .map(|f| Prediction {
                symbol: symbol.clone(),
                date: today + Duration::days(f.step as i64),
                predicted_price: f.point,
                confidence_lower: Some(f.lower),
                confidence_upper: Some(f.upper),
                model_type: "ARIMA".to_string(),
            })
            .collect();

        if predictions.is_empty() {
            warn!(%symbol, "forecast produced no steps");
            continue;
        }

        let rows = store.upsert_predictions(&predictions).await?;
        let last = &predictions[predictions.len() - 1];
        println!(
            "{:<8} {} predictions with order {} (day {}: {:.2} [{:.2}, {:.2}])",
            symbol,
            rows,
            order,
            days,
            last.predicted_price,
            last.confidence_lower.unwrap_or(f64::NAN),
            last.confidence_upper.unwrap_or(f64::NAN),
        );
    }

    Ok(())
}
