//! Row types returned by store queries.

use chrono::NaiveDate;
use sqlx::FromRow;
use stockpipe_core::{DailySentiment, PriceBar, SymbolCoverage};

#[derive(Debug, FromRow)]
pub(crate) struct BarRow {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl From<BarRow> for PriceBar {
    fn from(row: BarRow) -> Self {
        PriceBar::new(
            row.symbol, row.date, row.open, row.high, row.low, row.close, row.volume,
        )
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CloseRow {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, FromRow)]
pub(crate) struct SentimentRow {
    pub date: NaiveDate,
    pub avg_sentiment: f64,
    pub news_count: i64,
    pub positive_count: i64,
    pub negative_count: i64,
}

impl From<SentimentRow> for DailySentiment {
    fn from(row: SentimentRow) -> Self {
        DailySentiment {
            date: row.date,
            avg_sentiment: row.avg_sentiment,
            news_count: row.news_count,
            positive_count: row.positive_count,
            negative_count: row.negative_count,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CoverageRow {
    pub symbol: String,
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub row_count: i64,
}

impl From<CoverageRow> for SymbolCoverage {
    fn from(row: CoverageRow) -> Self {
        SymbolCoverage {
            symbol: row.symbol,
            earliest: row.earliest,
            latest: row.latest,
            row_count: row.row_count,
        }
    }
}
