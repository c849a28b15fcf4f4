//! Training-set assembly for downstream classifiers.
//!
//! Builds the numeric feature matrix downstream classifiers consume:
//! OHLCV, the persisted moving averages and daily return, and per-day
//! sentiment aggregates (zero-filled on days without scored news). Rows
//! with any undefined rolling feature are dropped before training.
//! Training itself happens elsewhere.

use std::collections::HashMap;

use chrono::NaiveDate;
use stockpipe_core::{DailySentiment, LabelError, LabeledBar};

use crate::labels::ensure_stratifiable;

pub const FEATURE_NAMES: [&str; 13] = [
    "open",
    "high",
    "low",
    "close",
    "volume",
    "ma_5",
    "ma_10",
    "ma_20",
    "daily_return",
    "avg_sentiment",
    "news_count",
    "positive_count",
    "negative_count",
];

/// A dense feature matrix with aligned binary targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub rows: Vec<Vec<f64>>,
    pub targets: Vec<u8>,
    pub dates: Vec<NaiveDate>,
}

impl TrainingSet {
    /// Assemble from labeled bars and optional sentiment aggregates.
    ///
    /// Fails with [`LabelError::SingleClass`] when the surviving rows hold
    /// one class only, since a stratified split downstream would be
    /// infeasible.
    pub fn assemble(
        labels: &[LabeledBar],
        sentiment: &HashMap<NaiveDate, DailySentiment>,
    ) -> Result<Self, LabelError> {
        let mut rows = Vec::new();
        let mut targets = Vec::new();
        let mut dates = Vec::new();
        let mut kept_labels = Vec::new();

        for label in labels {
            let clean = &label.clean;
            let (Some(ma_5), Some(ma_10), Some(ma_20), Some(daily_return)) =
                (clean.ma_5, clean.ma_10, clean.ma_20, clean.daily_return)
            else {
                continue;
            };

            let (avg_sentiment, news_count, positive, negative) =
                match sentiment.get(&clean.bar.date) {
                    Some(day) => (
                        day.avg_sentiment,
                        day.news_count as f64,
                        day.positive_count as f64,
                        day.negative_count as f64,
                    ),
                    None => (0.0, 0.0, 0.0, 0.0),
                };

            rows.push(vec![
                clean.bar.open,
                clean.bar.high,
                clean.bar.low,
                clean.bar.close,
                clean.bar.volume as f64,
                ma_5,
                ma_10,
                ma_20,
                daily_return,
                avg_sentiment,
                news_count,
                positive,
                negative,
            ]);
            targets.push(label.target);
            dates.push(clean.bar.date);
            kept_labels.push(label.clone());
        }

        ensure_stratifiable(&kept_labels)?;

        Ok(Self {
            rows,
            targets,
            dates,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
