//! Continuous update loop.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::info;

use crate::controller::SyncController;

/// Run full batch passes forever, sleeping `interval` between them.
///
/// The shutdown signal is honored only at the sleep boundary: an in-flight
/// batch always runs to completion, so no symbol is left mid-fetch.
pub async fn run_continuous(
    controller: &SyncController,
    symbols: &[String],
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(
        symbols = symbols.len(),
        interval_secs = interval.as_secs(),
        "starting continuous updates"
    );

    loop {
        let today = Utc::now().date_naive();
        let report = controller.sync_all(symbols, false, today).await;

        if *shutdown.borrow() {
            info!("continuous updates stopped");
            return;
        }

        let next =
            Utc::now() + chrono::Duration::from_std(interval).unwrap_or_else(|_| chrono::Duration::zero());
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            next_run = %next.format("%Y-%m-%d %H:%M:%S"),
            "sleeping until next pass"
        );

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("continuous updates stopped");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SyncConfig;
    use crate::retry::RetryPolicy;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use stockpipe_core::{FeedError, PriceFeed, RawBar};
    use stockpipe_store::BarStore;

    struct CountingFeed {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceFeed for CountingFeed {
        async fn fetch_daily(
            &self,
            _symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<RawBar>, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_shutdown_between_batches() {
        let feed = Arc::new(CountingFeed {
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(BarStore::open_in_memory().await.unwrap());
        let config = SyncConfig {
            symbol_delay: Duration::ZERO,
            retry: RetryPolicy::none(),
            ..SyncConfig::default()
        };
        let controller = SyncController::new(store, feed.clone(), config);

        let (tx, rx) = watch::channel(false);
        let symbols = vec!["AAPL".to_string()];

        // Signal shutdown while the first batch runs (or right after).
        tx.send(true).unwrap();

        run_continuous(&controller, &symbols, Duration::from_secs(3600), rx).await;

        // Exactly one full batch ran; the loop stopped without sleeping an hour.
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loop_repeats_until_shutdown() {
        let feed = Arc::new(CountingFeed {
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(BarStore::open_in_memory().await.unwrap());
        let config = SyncConfig {
            symbol_delay: Duration::ZERO,
            retry: RetryPolicy::none(),
            ..SyncConfig::default()
        };
        let controller = SyncController::new(store, feed.clone(), config);

        let (tx, rx) = watch::channel(false);
        let symbols = vec!["AAPL".to_string()];

        let handle = tokio::spawn(async move {
            run_continuous(&controller, &symbols, Duration::from_millis(5), rx).await;
        });

        tokio::time::sleep(Duration::from_millis(40)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(feed.calls.load(Ordering::SeqCst) >= 2);
    }
}
