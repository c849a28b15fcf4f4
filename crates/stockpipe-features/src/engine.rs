//! The feature engine: derives rolling statistics over a clean bar sequence.

use serde::{Deserialize, Serialize};
use stockpipe_core::{BarColumns, CleanBar, PriceBar};

use crate::rolling::{rolling_mean, rolling_std};

/// Window configuration for the feature engine.
///
/// Defaults mirror the persisted schema: close MAs of 5/10/20, a 5-period
/// volume MA, 5/10-period return volatility and a 14-period RSI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub ma_windows: [usize; 3],
    pub volume_ma_window: usize,
    pub volatility_windows: [usize; 2],
    pub rsi_period: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            ma_windows: [5, 10, 20],
            volume_ma_window: 5,
            volatility_windows: [5, 10],
            rsi_period: 14,
        }
    }
}

/// Computes deterministic rolling features over a date-sorted, validated
/// bar sequence for a single symbol.
///
/// Output is index-aligned with input: no rows are reordered or dropped,
/// and features without enough trailing history are `None`.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngine {
    config: FeatureConfig,
}

impl FeatureEngine {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn compute(&self, bars: &[PriceBar]) -> Vec<CleanBar> {
        let closes = bars.closes();
        let volumes: Vec<Option<f64>> = bars.volumes().into_iter().map(Some).collect();
        let close_opts: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();

        let returns = daily_returns(&closes);
        let (gains, losses) = gains_and_losses(&closes);

        let [w_short, w_mid, w_long] = self.config.ma_windows;
        let ma_short = rolling_mean(&close_opts, w_short);
        let ma_mid = rolling_mean(&close_opts, w_mid);
        let ma_long = rolling_mean(&close_opts, w_long);
        let volume_ma = rolling_mean(&volumes, self.config.volume_ma_window);

        let [v_short, v_long] = self.config.volatility_windows;
        let vol_short = rolling_std(&returns, v_short);
        let vol_long = rolling_std(&returns, v_long);

        let avg_gain = rolling_mean(&gains, self.config.rsi_period);
        let avg_loss = rolling_mean(&losses, self.config.rsi_period);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let price_range = bar.range();
                CleanBar {
                    bar: bar.clone(),
                    ma_5: ma_short[i],
                    ma_10: ma_mid[i],
                    ma_20: ma_long[i],
                    daily_return: returns[i],
                    price_range,
                    price_range_pct: price_range / bar.close * 100.0,
                    volume_ma_5: volume_ma[i],
                    volatility_5: vol_short[i],
                    volatility_10: vol_long[i],
                    rsi: rsi_at(avg_gain[i], avg_loss[i]),
                }
            })
            .collect()
    }
}

/// Day-over-day percent change of close; undefined at index 0.
fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut returns = vec![None; closes.len()];
    for i in 1..closes.len() {
        returns[i] = Some((closes[i] - closes[i - 1]) / closes[i - 1] * 100.0);
    }
    returns
}

/// Per-day upward and downward close moves, both non-negative.
fn gains_and_losses(closes: &[f64]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut gains = vec![None; closes.len()];
    let mut losses = vec![None; closes.len()];
    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        gains[i] = Some(delta.max(0.0));
        losses[i] = Some((-delta).max(0.0));
    }
    (gains, losses)
}

/// RSI from rolling average gain/loss. A zero average loss means maximal
/// strength and maps to 100, including the all-flat window.
fn rsi_at(avg_gain: Option<f64>, avg_loss: Option<f64>) -> Option<f64> {
    match (avg_gain, avg_loss) {
        (Some(gain), Some(loss)) => {
            if loss == 0.0 {
                Some(100.0)
            } else {
                Some(100.0 - 100.0 / (1.0 + gain / loss))
            }
        }
        _ => None,
    }
}
