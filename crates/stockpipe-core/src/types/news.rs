//! News headline and sentiment aggregate types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A news headline attributed to a symbol. Identity key is
/// (symbol, date, headline).
///
/// `sentiment_score` is filled in by an external scoring process and is
/// `None` until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub symbol: String,
    pub date: NaiveDate,
    pub headline: String,
    pub link: String,
    pub source: String,
    pub sentiment_score: Option<f64>,
}

/// Per-day sentiment aggregates over scored headlines for one symbol.
/// Positive/negative counts use |0.1| as the neutral band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub avg_sentiment: f64,
    pub news_count: i64,
    pub positive_count: i64,
    pub negative_count: i64,
}

/// Data availability for one symbol in the raw bar table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolCoverage {
    pub symbol: String,
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub row_count: i64,
}

impl SymbolCoverage {
    /// Days between the latest stored bar and `today`.
    pub fn days_stale(&self, today: NaiveDate) -> i64 {
        (today - self.latest).num_days()
    }
}
