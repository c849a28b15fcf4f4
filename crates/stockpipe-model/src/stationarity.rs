//! Augmented Dickey-Fuller unit-root test.
//!
//! Constant-only regression `Δy_t = α + γ·y_{t-1} + Σ δ_i·Δy_{t-i} + ε`;
//! the reported statistic is the t-ratio of γ. The p-value uses the
//! MacKinnon (1994) regression-surface approximation for the single-series,
//! constant-only case. The test is informational for this pipeline: it is
//! logged before order selection but never gates the grid search.

use statrs::distribution::{ContinuousCDF, Normal};
use stockpipe_core::ModelError;
use tracing::debug;

use crate::ols::ols;

/// Outcome of an ADF test run.
#[derive(Debug, Clone, PartialEq)]
pub struct AdfResult {
    /// The t-ratio of the level coefficient.
    pub statistic: f64,
    /// MacKinnon approximate p-value.
    pub p_value: f64,
    /// Number of lagged difference terms included.
    pub used_lags: usize,
    /// Observations entering the regression.
    pub nobs: usize,
}

impl AdfResult {
    /// Stationary at the conventional 5% level.
    pub fn is_stationary(&self) -> bool {
        self.p_value < 0.05
    }
}

/// Run the test on a level series.
///
/// `max_lag` defaults to Schwert's rule `⌊12·(n/100)^{1/4}⌋`, capped so the
/// regression keeps enough degrees of freedom.
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> Result<AdfResult, ModelError> {
    let n = series.len();
    let lags = max_lag.unwrap_or_else(|| schwert_lag(n));

    // k regressors: intercept + level + `lags` difference terms.
    let k = lags + 2;
    let min_obs = k + lags + 2;
    if n < min_obs {
        return Err(ModelError::InsufficientData {
            required: min_obs,
            available: n,
        });
    }

    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let mut y = Vec::with_capacity(diffs.len() - lags);
    let mut rows = Vec::with_capacity(diffs.len() - lags);
    for t in lags..diffs.len() {
        y.push(diffs[t]);
        let mut row = Vec::with_capacity(k);
        row.push(1.0);
        row.push(series[t]); // y_{t-1} relative to diffs[t]
        for lag in 1..=lags {
            row.push(diffs[t - lag]);
        }
        rows.push(row);
    }

    let fit = ols(&y, &rows).map_err(ModelError::Fit)?;
    let statistic = fit.coef[1] / fit.std_errors[1];
    let p_value = mackinnon_p(statistic);

    debug!(statistic, p_value, lags, "ADF test");

    Ok(AdfResult {
        statistic,
        p_value,
        used_lags: lags,
        nobs: y.len(),
    })
}

/// Schwert's lag-order rule of thumb.
fn schwert_lag(n: usize) -> usize {
    (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize
}

// MacKinnon (1994) surface coefficients for the constant-only, one-series
// tau distribution.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Approximate p-value for an ADF tau statistic.
fn mackinnon_p(statistic: f64) -> f64 {
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }

    let z = if statistic <= TAU_STAR {
        polyval(&TAU_SMALL_P, statistic)
    } else {
        polyval(&TAU_LARGE_P, statistic)
    };

    // Unit normal; the constructor cannot fail for these parameters.
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.cdf(z)
}

/// Evaluate a polynomial given coefficients in increasing power order.
fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
