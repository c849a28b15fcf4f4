//! CSV news import.
//!
//! Headline scraping lives outside this system; exported headline files are
//! ingested from CSV instead. Sentiment scores are optional and usually
//! absent at import time.

use async_trait::async_trait;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::PathBuf;
use stockpipe_core::{FeedError, NewsFeed, NewsItem};

const MAX_HEADLINE_LEN: usize = 500;

#[derive(Debug, Deserialize)]
struct NewsRecord {
    symbol: String,
    date: String,
    headline: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    sentiment_score: Option<f64>,
}

/// News feed reading a single exported CSV file with columns
/// `symbol,date,headline,link,source,sentiment_score`.
pub struct CsvNewsFeed {
    path: PathBuf,
}

impl CsvNewsFeed {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, FeedError> {
        let path = path.into();
        if !path.is_file() {
            return Err(FeedError::Internal(format!(
                "not a file: {}",
                path.display()
            )));
        }
        Ok(Self { path })
    }
}

/// Collapse whitespace and cap the headline at the stored column width.
fn normalize_headline(raw: &str) -> String {
    let mut headline = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if headline.len() > MAX_HEADLINE_LEN {
        let mut cut = MAX_HEADLINE_LEN - 3;
        while !headline.is_char_boundary(cut) {
            cut -= 1;
        }
        headline.truncate(cut);
        headline.push_str("...");
    }
    headline
}

#[async_trait]
impl NewsFeed for CsvNewsFeed {
    async fn fetch_headlines(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsItem>, FeedError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        let mut items = Vec::new();
        for result in reader.deserialize() {
            let record: NewsRecord = result.map_err(|e| FeedError::Parse(e.to_string()))?;
            if !record.symbol.eq_ignore_ascii_case(symbol) {
                continue;
            }
            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
                .map_err(|e| FeedError::Parse(format!("bad date {}: {}", record.date, e)))?;

            let headline = normalize_headline(&record.headline);
            if headline.is_empty() {
                continue;
            }

            items.push(NewsItem {
                symbol: symbol.to_uppercase(),
                date,
                headline,
                link: record.link,
                source: if record.source.is_empty() {
                    "Unknown".to_string()
                } else {
                    record.source
                },
                sentiment_score: record.sentiment_score,
            });

            if items.len() == limit {
                break;
            }
        }

        Ok(items)
    }

    fn name(&self) -> &str {
        "csv-news"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_headline_whitespace() {
        assert_eq!(
            normalize_headline("  Apple   beats\testimates \n again "),
            "Apple beats estimates again"
        );
    }

    #[test]
    fn test_normalize_headline_truncation() {
        let long = "x".repeat(600);
        let normalized = normalize_headline(&long);

        assert_eq!(normalized.len(), MAX_HEADLINE_LEN);
        assert!(normalized.ends_with("..."));
    }
}
