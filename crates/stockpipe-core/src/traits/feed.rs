//! Feed trait definitions.

use crate::error::FeedError;
use crate::types::{NewsItem, RawBar};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for daily price bar providers.
///
/// Implementations are failure-prone and possibly rate-limited; callers
/// wrap them in a retry policy. An empty result is a successful no-op,
/// not an error.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch daily bars for a symbol over an inclusive date window.
    ///
    /// # Returns
    /// Bars ordered oldest to newest; possibly empty.
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, FeedError>;

    /// Get the feed name for logging and provenance.
    fn name(&self) -> &str;
}

/// Trait for news headline providers.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// Fetch up to `limit` recent headlines for a symbol.
    async fn fetch_headlines(&self, symbol: &str, limit: usize)
        -> Result<Vec<NewsItem>, FeedError>;

    /// Get the feed name for logging and provenance.
    fn name(&self) -> &str;
}
