//! Supervised-learning label type.

use serde::{Deserialize, Serialize};

use super::CleanBar;

/// A clean bar with a forward-return classification target attached.
///
/// Rows near the end of a series, whose forward horizon extends past the
/// last available bar, are never represented as a `LabeledBar`; they are
/// excluded from the labeled output rather than carrying a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledBar {
    #[serde(flatten)]
    pub clean: CleanBar,
    /// Close H trading days ahead.
    pub future_close: f64,
    /// Percent change from this close to `future_close`.
    pub price_change_pct: f64,
    /// 1 if `price_change_pct` exceeds the configured threshold, else 0.
    pub target: u8,
}
