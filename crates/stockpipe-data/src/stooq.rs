//! Stooq daily-bar feed.
//!
//! Stooq serves daily history as plain CSV from a keyless endpoint, which
//! makes it the default remote provider. US equities are addressed as
//! `{symbol}.us`.

use async_trait::async_trait;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use stockpipe_core::{FeedError, PriceFeed, RawBar};

const DEFAULT_BASE_URL: &str = "https://stooq.com";

#[derive(Debug, Deserialize)]
struct StooqRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open", default)]
    open: Option<f64>,
    #[serde(rename = "High", default)]
    high: Option<f64>,
    #[serde(rename = "Low", default)]
    low: Option<f64>,
    #[serde(rename = "Close", default)]
    close: Option<f64>,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

/// HTTP price feed backed by Stooq's CSV download endpoint.
pub struct StooqFeed {
    client: reqwest::Client,
    base_url: String,
}

impl StooqFeed {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the feed at an alternate host (used by tests and mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn download_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/q/d/l/?s={}.us&d1={}&d2={}&i=d",
            self.base_url,
            symbol.to_lowercase(),
            start.format("%Y%m%d"),
            end.format("%Y%m%d"),
        )
    }
}

impl Default for StooqFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a Stooq CSV body into raw bars. A "No data" body or a bare header
/// yields an empty result.
fn parse_body(symbol: &str, body: &str) -> Result<Vec<RawBar>, FeedError> {
    if body.trim().is_empty() || body.starts_with("No data") {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: StooqRecord = result.map_err(|e| FeedError::Parse(e.to_string()))?;
        let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
            .map_err(|e| FeedError::Parse(format!("bad date {}: {}", record.date, e)))?;
        bars.push(RawBar {
            symbol: symbol.to_string(),
            date,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume.map(|v| v as i64),
        });
    }

    Ok(bars)
}

#[async_trait]
impl PriceFeed for StooqFeed {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, FeedError> {
        if start > end {
            return Err(FeedError::InvalidRange { start, end });
        }

        let url = self.download_url(symbol, start, end);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                FeedError::Connection(e.to_string())
            } else {
                FeedError::Internal(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(FeedError::RateLimited(format!("{} for {}", status, symbol)));
        }
        if !status.is_success() {
            return Err(FeedError::Connection(format!("{} for {}", status, url)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;

        parse_body(symbol, &body)
    }

    fn name(&self) -> &str {
        "stooq"
    }
}
