//! Forward-return label construction.

use serde::{Deserialize, Serialize};
use stockpipe_core::{CleanBar, LabelError, LabeledBar};
use tracing::info;

/// Horizon and threshold for the binary target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Days ahead the target looks.
    pub horizon: usize,
    /// Percent move that counts as a positive example.
    pub threshold_pct: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            horizon: 30,
            threshold_pct: 2.0,
        }
    }
}

/// Attach a binary forward-return target to each bar that has a full
/// horizon of lookahead. The last `horizon` bars have no defined target
/// and are excluded from the output entirely.
pub fn build_labels(
    clean: &[CleanBar],
    config: &LabelConfig,
) -> Result<Vec<LabeledBar>, LabelError> {
    if clean.is_empty() {
        return Err(LabelError::EmptyInput);
    }
    if clean.len() <= config.horizon {
        return Err(LabelError::HorizonTooLong {
            horizon: config.horizon,
            available: clean.len(),
        });
    }

    let labeled: Vec<LabeledBar> = clean[..clean.len() - config.horizon]
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let future_close = clean[i + config.horizon].bar.close;
            let price_change_pct = (future_close - bar.bar.close) / bar.bar.close * 100.0;
            LabeledBar {
                clean: bar.clone(),
                future_close,
                price_change_pct,
                target: u8::from(price_change_pct > config.threshold_pct),
            }
        })
        .collect();

    let (down, up) = class_counts(&labeled);
    info!(
        rows = labeled.len(),
        positive = up,
        negative = down,
        horizon = config.horizon,
        "built labels"
    );

    Ok(labeled)
}

/// Rows per class, as (negative, positive).
pub fn class_counts(labels: &[LabeledBar]) -> (usize, usize) {
    let up = labels.iter().filter(|l| l.target == 1).count();
    (labels.len() - up, up)
}

/// A label set with a single class cannot feed a stratified split; surface
/// that as a distinct error instead of letting a downstream split degrade.
pub fn ensure_stratifiable(labels: &[LabeledBar]) -> Result<(), LabelError> {
    if labels.is_empty() {
        return Err(LabelError::EmptyInput);
    }
    let (down, up) = class_counts(labels);
    if up == 0 {
        return Err(LabelError::SingleClass {
            class: 0,
            count: down,
        });
    }
    if down == 0 {
        return Err(LabelError::SingleClass {
            class: 1,
            count: up,
        });
    }
    Ok(())
}
