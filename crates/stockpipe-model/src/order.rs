//! ARIMA order selection by AIC grid search.

use stockpipe_core::ArimaOrder;
use tracing::{debug, info, warn};

use crate::arima::ArimaFitter;

/// Grid bounds and fallback for order selection.
#[derive(Debug, Clone)]
pub struct OrderSelector {
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
    pub default_order: ArimaOrder,
}

impl Default for OrderSelector {
    fn default() -> Self {
        Self {
            max_p: 3,
            max_d: 2,
            max_q: 3,
            default_order: ArimaOrder::default(),
        }
    }
}

/// Result of a grid search.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    pub order: ArimaOrder,
    /// AIC of the winning candidate; `None` when the selection fell back
    /// to the default order because nothing fitted.
    pub aic: Option<f64>,
    pub fell_back: bool,
    pub candidates_tried: usize,
    pub candidates_failed: usize,
}

impl OrderSelector {
    pub fn new(max_p: usize, max_d: usize, max_q: usize, default_order: ArimaOrder) -> Self {
        Self {
            max_p,
            max_d,
            max_q,
            default_order,
        }
    }

    /// Enumerate every (p, d, q) in the grid, fit each candidate, and keep
    /// the lowest AIC. Ties keep the first-found candidate (iteration is
    /// p-major, then d, then q). Candidates that fail to fit are skipped;
    /// if none fits, the configured default order is returned with no AIC.
    pub fn select(&self, series: &[f64], fitter: &dyn ArimaFitter) -> SelectionOutcome {
        let mut best: Option<(ArimaOrder, f64)> = None;
        let mut tried = 0usize;
        let mut failed = 0usize;

        for p in 0..=self.max_p {
            for d in 0..=self.max_d {
                for q in 0..=self.max_q {
                    let order = ArimaOrder::new(p, d, q);
                    tried += 1;
                    match fitter.fit(series, order) {
                        Ok(fit) => {
                            if best.as_ref().map_or(true, |(_, aic)| fit.aic < *aic) {
                                best = Some((order, fit.aic));
                            }
                        }
                        Err(e) => {
                            failed += 1;
                            debug!(%order, error = %e, "candidate fit failed");
                        }
                    }
                }
            }
        }

        match best {
            Some((order, aic)) => {
                info!(%order, aic, "selected ARIMA order");
                SelectionOutcome {
                    order,
                    aic: Some(aic),
                    fell_back: false,
                    candidates_tried: tried,
                    candidates_failed: failed,
                }
            }
            None => {
                warn!(
                    default = %self.default_order,
                    "no ARIMA candidate fitted; falling back to default order"
                );
                SelectionOutcome {
                    order: self.default_order,
                    aic: None,
                    fell_back: true,
                    candidates_tried: tried,
                    candidates_failed: failed,
                }
            }
        }
    }
}
