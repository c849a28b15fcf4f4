//! The sync controller: per-symbol incremental updates and soft-failing
//! batch runs.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use stockpipe_core::{FeedError, NewsFeed, PipelineResult, PriceFeed, RawBar};
use stockpipe_data::clean_bars;
use stockpipe_store::BarStore;
use tracing::{info, warn};

use crate::planner::{plan_window, SyncPlan, SyncWindowConfig};
use crate::retry::RetryPolicy;

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub window: SyncWindowConfig,
    pub retry: RetryPolicy,
    /// Pause between symbols in a batch run, for provider rate limits.
    pub symbol_delay: Duration,
    /// Headlines requested per symbol on a news sync.
    pub news_limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window: SyncWindowConfig::default(),
            retry: RetryPolicy::default(),
            symbol_delay: Duration::from_millis(500),
            news_limit: 50,
        }
    }
}

/// Per-symbol result of a successful sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// New or refreshed rows were upserted.
    Updated { rows: usize },
    /// Store already held today's bar and the run was not forced.
    AlreadyCurrent,
    /// Provider returned nothing usable for the window.
    NoData,
}

/// One symbol's entry in a batch report. Failures carry the rendered error;
/// the batch itself never fails.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolResult {
    pub symbol: String,
    pub outcome: Result<SyncOutcome, String>,
}

/// Aggregate of a batch run over the configured universe.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub results: Vec<SymbolResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn rows_written(&self) -> usize {
        self.results
            .iter()
            .filter_map(|r| match r.outcome {
                Ok(SyncOutcome::Updated { rows }) => Some(rows),
                _ => None,
            })
            .sum()
    }
}

/// Brings the store up to date per symbol, fetching only the missing
/// window and writing idempotently.
pub struct SyncController {
    store: Arc<BarStore>,
    feed: Arc<dyn PriceFeed>,
    config: SyncConfig,
}

impl SyncController {
    pub fn new(store: Arc<BarStore>, feed: Arc<dyn PriceFeed>, config: SyncConfig) -> Self {
        Self {
            store,
            feed,
            config,
        }
    }

    pub fn store(&self) -> &BarStore {
        &self.store
    }

    /// Sync one symbol. Provider errors that survive the retry policy and
    /// store failures propagate; batch runs convert them to per-symbol
    /// failures.
    pub async fn sync_symbol(
        &self,
        symbol: &str,
        force: bool,
        today: NaiveDate,
    ) -> PipelineResult<SyncOutcome> {
        let latest = self.store.latest_bar_date(symbol).await?;

        let (start, end) = match plan_window(latest, today, self.config.window, force) {
            SyncPlan::UpToDate => {
                info!(symbol, ?latest, "store is current");
                return Ok(SyncOutcome::AlreadyCurrent);
            }
            SyncPlan::Fetch { start, end } => (start, end),
        };

        info!(symbol, %start, %end, "fetching window");
        let raw = self.fetch_with_retry(symbol, start, end).await?;

        if raw.is_empty() {
            info!(symbol, "provider returned no rows for window");
            return Ok(SyncOutcome::NoData);
        }

        let fetched = raw.len();
        let (bars, report) = clean_bars(raw);
        if report.total_dropped() > 0 {
            info!(
                symbol,
                dropped = report.total_dropped(),
                filled = report.forward_filled,
                "cleaned fetched rows"
            );
        }

        if bars.is_empty() {
            warn!(symbol, fetched, "no valid rows after cleaning; skipping");
            return Ok(SyncOutcome::NoData);
        }

        let rows = self.store.upsert_bars(&bars).await?;
        info!(symbol, rows, "sync complete");
        Ok(SyncOutcome::Updated { rows })
    }

    async fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, FeedError> {
        let policy = self.config.retry;
        let mut attempt = 0u32;
        loop {
            match self.feed.fetch_daily(symbol, start, end).await {
                Ok(bars) => return Ok(bars),
                Err(e) if e.is_transient() && attempt < policy.max_retries => {
                    let delay = policy.delay_for(attempt);
                    warn!(
                        symbol,
                        attempt = attempt + 1,
                        ?delay,
                        error = %e,
                        "transient fetch failure; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Sync every symbol in the batch, pausing between symbols. Individual
    /// failures are logged and counted; the batch always completes.
    pub async fn sync_all(
        &self,
        symbols: &[String],
        force: bool,
        today: NaiveDate,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let total = symbols.len();

        for (i, symbol) in symbols.iter().enumerate() {
            info!(symbol, n = i + 1, total, "processing");

            let outcome = self
                .sync_symbol(symbol, force, today)
                .await
                .map_err(|e| {
                    warn!(symbol, error = %e, "symbol sync failed");
                    e.to_string()
                });

            report.results.push(SymbolResult {
                symbol: symbol.clone(),
                outcome,
            });

            if i + 1 < total && !self.config.symbol_delay.is_zero() {
                tokio::time::sleep(self.config.symbol_delay).await;
            }
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            rows = report.rows_written(),
            "batch complete"
        );
        report
    }

    /// Fetch and upsert headlines for one symbol, deduplicated by
    /// (symbol, date, headline) at the store.
    pub async fn sync_news_symbol(
        &self,
        news: &dyn NewsFeed,
        symbol: &str,
    ) -> PipelineResult<usize> {
        let items = news
            .fetch_headlines(symbol, self.config.news_limit)
            .await?;
        if items.is_empty() {
            info!(symbol, "no headlines");
            return Ok(0);
        }
        let rows = self.store.upsert_news(&items).await?;
        info!(symbol, rows, "news sync complete");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stockpipe_core::PipelineError;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// Scripted feed: per-symbol canned responses plus a call counter.
    struct MockFeed {
        bars: HashMap<String, Vec<RawBar>>,
        failures: HashMap<String, FeedError>,
        /// Symbols that fail transiently this many times before succeeding.
        flaky_budget: HashMap<String, AtomicUsize>,
        calls: AtomicUsize,
    }

    impl MockFeed {
        fn new() -> Self {
            Self {
                bars: HashMap::new(),
                failures: HashMap::new(),
                flaky_budget: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_bars(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
            self.bars.insert(symbol.to_string(), bars);
            self
        }

        fn with_failure(mut self, symbol: &str, error: FeedError) -> Self {
            self.failures.insert(symbol.to_string(), error);
            self
        }

        fn with_flaky(mut self, symbol: &str, failures_before_success: usize) -> Self {
            self.flaky_budget
                .insert(symbol.to_string(), AtomicUsize::new(failures_before_success));
            self
        }
    }

    #[async_trait]
    impl PriceFeed for MockFeed {
        async fn fetch_daily(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<RawBar>, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(budget) = self.flaky_budget.get(symbol) {
                if budget
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
                    .is_ok()
                {
                    return Err(FeedError::Connection("flaky".to_string()));
                }
            }

            if let Some(error) = self.failures.get(symbol) {
                return Err(error.clone());
            }

            Ok(self
                .bars
                .get(symbol)
                .map(|bars| {
                    bars.iter()
                        .filter(|b| b.date >= start && b.date <= end)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn bars_for(symbol: &str, dates: &[&str]) -> Vec<RawBar> {
        dates
            .iter()
            .map(|d| RawBar::complete(symbol, date(d), 100.0, 101.0, 99.0, 100.5, 1000))
            .collect()
    }

    fn fast_config() -> SyncConfig {
        SyncConfig {
            symbol_delay: Duration::ZERO,
            retry: RetryPolicy {
                max_retries: 3,
                backoff: crate::retry::Backoff::Fixed {
                    delay: Duration::from_millis(1),
                },
            },
            ..SyncConfig::default()
        }
    }

    async fn controller(feed: MockFeed) -> SyncController {
        let store = Arc::new(BarStore::open_in_memory().await.unwrap());
        SyncController::new(store, Arc::new(feed), fast_config())
    }

    #[tokio::test]
    async fn test_fresh_symbol_full_sync() {
        let today = date("2024-03-15");
        let feed = MockFeed::new().with_bars("AAPL", bars_for("AAPL", &["2024-03-13", "2024-03-14", "2024-03-15"]));
        let ctl = controller(feed).await;

        let outcome = ctl.sync_symbol("AAPL", false, today).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Updated { rows: 3 });
        assert_eq!(ctl.store().bar_count("AAPL").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_current_symbol_skips_fetch() {
        let today = date("2024-03-15");
        let feed = Arc::new(
            MockFeed::new().with_bars("AAPL", bars_for("AAPL", &["2024-03-15"])),
        );
        let store = Arc::new(BarStore::open_in_memory().await.unwrap());
        let ctl = SyncController::new(store, feed.clone(), fast_config());

        ctl.sync_symbol("AAPL", false, today).await.unwrap();
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);

        let outcome = ctl.sync_symbol("AAPL", false, today).await.unwrap();
        assert_eq!(outcome, SyncOutcome::AlreadyCurrent);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let today = date("2024-03-15");
        let feed = MockFeed::new().with_bars("AAPL", bars_for("AAPL", &["2024-03-13", "2024-03-14"]));
        let ctl = controller(feed).await;

        ctl.sync_symbol("AAPL", true, today).await.unwrap();
        ctl.sync_symbol("AAPL", true, today).await.unwrap();

        assert_eq!(ctl.store().bar_count("AAPL").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_window_is_no_data() {
        let today = date("2024-03-15");
        let ctl = controller(MockFeed::new()).await;

        let outcome = ctl.sync_symbol("AAPL", false, today).await.unwrap();
        assert_eq!(outcome, SyncOutcome::NoData);
        assert_eq!(ctl.store().bar_count("AAPL").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dirty_rows_cleaned_before_upsert() {
        let today = date("2024-03-15");
        let mut bars = bars_for("AAPL", &["2024-03-13", "2024-03-14", "2024-03-14"]);
        bars.push(RawBar::complete("AAPL", date("2024-03-15"), -1.0, 1.0, 0.5, 0.9, 10));
        let ctl = controller(MockFeed::new().with_bars("AAPL", bars)).await;

        let outcome = ctl.sync_symbol("AAPL", false, today).await.unwrap();

        // duplicate and negative-price rows dropped
        assert_eq!(outcome, SyncOutcome::Updated { rows: 2 });
    }

    #[tokio::test]
    async fn test_transient_failure_retried() {
        let today = date("2024-03-15");
        let feed = MockFeed::new()
            .with_flaky("AAPL", 2)
            .with_bars("AAPL", bars_for("AAPL", &["2024-03-15"]));
        let ctl = controller(feed).await;

        let outcome = ctl.sync_symbol("AAPL", false, today).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Updated { rows: 1 });
    }

    #[tokio::test]
    async fn test_exhausted_retries_propagate() {
        let today = date("2024-03-15");
        let feed = MockFeed::new().with_flaky("AAPL", 10);
        let ctl = controller(feed).await;

        let result = ctl.sync_symbol("AAPL", false, today).await;
        assert!(matches!(
            result,
            Err(PipelineError::Feed(FeedError::Connection(_)))
        ));
    }

    #[tokio::test]
    async fn test_batch_soft_failure() {
        let today = date("2024-03-15");
        let feed = MockFeed::new()
            .with_bars("AAPL", bars_for("AAPL", &["2024-03-15"]))
            .with_bars("MSFT", bars_for("MSFT", &["2024-03-15"]))
            .with_failure("NVDA", FeedError::SymbolNotFound("NVDA".to_string()));
        let ctl = controller(feed).await;

        let symbols: Vec<String> = ["AAPL", "NVDA", "MSFT"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = ctl.sync_all(&symbols, false, today).await;

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.rows_written(), 2);
        assert_eq!(report.results[1].symbol, "NVDA");
        assert!(report.results[1].outcome.is_err());
    }
}
