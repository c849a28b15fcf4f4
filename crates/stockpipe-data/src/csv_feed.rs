//! CSV-backed price feed for local/offline data.

use async_trait::async_trait;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stockpipe_core::{FeedError, PriceFeed, RawBar};

/// CSV record format. Empty price cells deserialize to `None` and flow
/// through the cleaning stage's forward-fill.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date")]
    date: String,
    #[serde(alias = "Open", alias = "open", default)]
    open: Option<f64>,
    #[serde(alias = "High", alias = "high", default)]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close", default)]
    close: Option<f64>,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<i64>,
}

/// Price feed reading `{dir}/{SYMBOL}.csv` files.
pub struct CsvPriceFeed {
    dir: PathBuf,
}

impl CsvPriceFeed {
    /// Create a feed rooted at a directory of per-symbol CSV files.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, FeedError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(FeedError::Internal(format!(
                "not a directory: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    fn symbol_path(&self, symbol: &str) -> Option<PathBuf> {
        let candidates = [
            self.dir.join(format!("{}.csv", symbol)),
            self.dir.join(format!("{}.csv", symbol.to_lowercase())),
        ];
        candidates.into_iter().find(|p| p.exists())
    }

    fn load(&self, symbol: &str, path: &Path) -> Result<Vec<RawBar>, FeedError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        let mut bars = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| FeedError::Parse(e.to_string()))?;
            let date = parse_date(&record.date)?;
            bars.push(RawBar {
                symbol: symbol.to_string(),
                date,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record.volume,
            });
        }

        Ok(bars)
    }
}

/// Parse the date formats seen in exported price files.
fn parse_date(date_str: &str) -> Result<NaiveDate, FeedError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    Err(FeedError::Parse(format!("Could not parse date: {}", date_str)))
}

#[async_trait]
impl PriceFeed for CsvPriceFeed {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, FeedError> {
        if start > end {
            return Err(FeedError::InvalidRange { start, end });
        }

        let Some(path) = self.symbol_path(symbol) else {
            return Ok(Vec::new());
        };

        let mut bars = self.load(symbol, &path)?;
        bars.retain(|b| b.date >= start && b.date <= end);
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
