//! Model-facing pipeline stages.
//!
//! Everything here is pure computation over in-memory sequences: label
//! construction for classification, training-set assembly, the augmented
//! Dickey-Fuller stationarity test, ARIMA order selection by grid search,
//! and binary classification metrics.

pub mod arima;
pub mod dataset;
pub mod labels;
pub mod metrics;
mod ols;
pub mod order;
pub mod stationarity;

pub use arima::{ArimaFit, ArimaFitter, CssArimaFitter, Forecast};
pub use dataset::TrainingSet;
pub use labels::{build_labels, class_counts, ensure_stratifiable, LabelConfig};
pub use metrics::BinaryMetrics;
pub use order::{OrderSelector, SelectionOutcome};
pub use stationarity::{adf_test, AdfResult};
