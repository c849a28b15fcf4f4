//! Incremental synchronization against the bar store.
//!
//! Decides per symbol how much history must be (re)fetched, pushes fetched
//! rows through the cleaning stage, and upserts idempotently. Batch runs
//! fail softly per symbol; the continuous mode repeats batches on an
//! interval and honors cancellation only between iterations.

pub mod controller;
pub mod planner;
pub mod retry;
pub mod watcher;

pub use controller::{BatchReport, SymbolResult, SyncConfig, SyncController, SyncOutcome};
pub use planner::{plan_window, SyncPlan, SyncWindowConfig};
pub use retry::{Backoff, RetryPolicy};
pub use watcher::run_continuous;
