//! Durable storage for the pipeline, keyed by (symbol, date).
//!
//! One SQLite database holds raw bars (`stocks`), feature-engineered bars
//! (`stocks_clean`), headlines (`news`), forecasts (`predictions`) and
//! classifier evaluations (`model_metrics`). All writes are idempotent
//! upserts; re-syncing a window never duplicates or partially mutates rows.

mod rows;
mod store;

pub use store::BarStore;
