//! ARIMA fitting seam and the default conditional-sum-of-squares fitter.
//!
//! Order selection only needs a fitter that returns a comparable AIC or a
//! typed failure; the estimator behind [`ArimaFitter`] is swappable. The
//! built-in [`CssArimaFitter`] differences the series, then estimates ARMA
//! coefficients by Hannan-Rissanen two-stage least squares, which is fast
//! and adequate for ranking candidate orders.

use stockpipe_core::{ArimaOrder, FitError};

use crate::ols::ols;

/// A fitted ARIMA model for one series.
#[derive(Debug, Clone)]
pub struct ArimaFit {
    pub order: ArimaOrder,
    /// Akaike information criterion; lower is better.
    pub aic: f64,
    /// Innovation variance estimate.
    pub sigma2: f64,
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    /// The d-times differenced series.
    diffed: Vec<f64>,
    /// Residuals aligned with `diffed` (zero where not estimated).
    residuals: Vec<f64>,
    /// Last value of each differencing level 0..d, for re-integration.
    level_tails: Vec<f64>,
}

/// One forecast step on the level scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// 1-based horizon step.
    pub step: usize,
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Trait seam for ARIMA estimation.
pub trait ArimaFitter: Send + Sync {
    /// Fit the given order on a level series, returning a scored fit or a
    /// typed failure. Failures are expected during grid search and are
    /// never fatal to the caller.
    fn fit(&self, series: &[f64], order: ArimaOrder) -> Result<ArimaFit, FitError>;
}

/// Default CSS/Hannan-Rissanen fitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssArimaFitter;

impl ArimaFitter for CssArimaFitter {
    fn fit(&self, series: &[f64], order: ArimaOrder) -> Result<ArimaFit, FitError> {
        let ArimaOrder { p, d, q } = order;
        let min_len = d + 3 * (p + q) + 12;
        if series.len() < min_len {
            return Err(FitError::TooShort {
                required: min_len,
                available: series.len(),
            });
        }

        let (w, level_tails) = difference(series, d);
        let nw = w.len();

        let (intercept, ar, ma, residuals, sigma2, nobs) = if q == 0 {
            fit_pure_ar(&w, p)?
        } else {
            fit_arma(&w, p, q)?
        };

        if sigma2 <= 0.0 || !sigma2.is_finite() {
            return Err(FitError::NonFinite("variance"));
        }

        // Gaussian CSS shortcut: n·ln(σ²) + 2k with k counting AR, MA,
        // intercept and variance parameters. Comparable across candidates,
        // which is all the selector needs.
        let aic = nobs as f64 * sigma2.ln() + 2.0 * (p + q + 2) as f64;
        if !aic.is_finite() {
            return Err(FitError::NonFinite("aic"));
        }

        debug_assert_eq!(residuals.len(), nw);

        Ok(ArimaFit {
            order,
            aic,
            sigma2,
            intercept,
            ar,
            ma,
            diffed: w,
            residuals,
            level_tails,
        })
    }
}

type ArmaEstimate = (f64, Vec<f64>, Vec<f64>, Vec<f64>, f64, usize);

/// AR(p) (or white noise for p = 0) by direct OLS.
fn fit_pure_ar(w: &[f64], p: usize) -> Result<ArmaEstimate, FitError> {
    let nw = w.len();

    if p == 0 {
        let mean = w.iter().sum::<f64>() / nw as f64;
        let residuals: Vec<f64> = w.iter().map(|v| v - mean).collect();
        let sse: f64 = residuals.iter().map(|e| e * e).sum();
        let sigma2 = sse / nw as f64;
        return Ok((mean, Vec::new(), Vec::new(), residuals, sigma2, nw));
    }

    let mut y = Vec::with_capacity(nw - p);
    let mut rows = Vec::with_capacity(nw - p);
    for t in p..nw {
        y.push(w[t]);
        let mut row = Vec::with_capacity(p + 1);
        row.push(1.0);
        for i in 1..=p {
            row.push(w[t - i]);
        }
        rows.push(row);
    }

    let fit = ols(&y, &rows)?;
    let intercept = fit.coef[0];
    let ar = fit.coef[1..].to_vec();

    let mut residuals = vec![0.0; nw];
    for (offset, e) in fit.residuals.iter().enumerate() {
        residuals[p + offset] = *e;
    }
    let nobs = y.len();
    let sigma2 = fit.sse / nobs as f64;

    Ok((intercept, ar, Vec::new(), residuals, sigma2, nobs))
}

/// ARMA(p, q) by Hannan-Rissanen: a long autoregression proxies the
/// innovations, then the ARMA regression runs on lagged values and lagged
/// proxy residuals.
fn fit_arma(w: &[f64], p: usize, q: usize) -> Result<ArmaEstimate, FitError> {
    let nw = w.len();
    let m = p + q + 2;

    // Stage 1: long AR(m) for innovation proxies.
    let mut y1 = Vec::with_capacity(nw - m);
    let mut rows1 = Vec::with_capacity(nw - m);
    for t in m..nw {
        y1.push(w[t]);
        let mut row = Vec::with_capacity(m + 1);
        row.push(1.0);
        for i in 1..=m {
            row.push(w[t - i]);
        }
        rows1.push(row);
    }
    let stage1 = ols(&y1, &rows1)?;

    let mut eps = vec![0.0; nw];
    for (offset, e) in stage1.residuals.iter().enumerate() {
        eps[m + offset] = *e;
    }

    // Stage 2: regress on p lagged values and q lagged proxy innovations.
    let t0 = m.max(p);
    let mut y2 = Vec::with_capacity(nw - t0);
    let mut rows2 = Vec::with_capacity(nw - t0);
    for t in t0..nw {
        y2.push(w[t]);
        let mut row = Vec::with_capacity(1 + p + q);
        row.push(1.0);
        for i in 1..=p {
            row.push(w[t - i]);
        }
        for j in 1..=q {
            row.push(eps[t - j]);
        }
        rows2.push(row);
    }
    let stage2 = ols(&y2, &rows2)?;

    let intercept = stage2.coef[0];
    let ar = stage2.coef[1..1 + p].to_vec();
    let ma = stage2.coef[1 + p..].to_vec();

    let mut residuals = vec![0.0; nw];
    for (offset, e) in stage2.residuals.iter().enumerate() {
        residuals[t0 + offset] = *e;
    }
    let nobs = y2.len();
    let sigma2 = stage2.sse / nobs as f64;

    Ok((intercept, ar, ma, residuals, sigma2, nobs))
}

/// Difference `d` times, recording the tail of each level for integration.
fn difference(series: &[f64], d: usize) -> (Vec<f64>, Vec<f64>) {
    let mut current = series.to_vec();
    let mut tails = Vec::with_capacity(d);
    for _ in 0..d {
        tails.push(current[current.len() - 1]);
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    (current, tails)
}

impl ArimaFit {
    /// Iterate the fitted recursion `steps` ahead and integrate back to the
    /// level scale. The confidence band is `±1.96·σ̂·√h` at step h.
    pub fn forecast(&self, steps: usize) -> Vec<Forecast> {
        let mut w_hist = self.diffed.clone();
        let mut e_hist = self.residuals.clone();
        let mut tails = self.level_tails.clone();
        let sigma = self.sigma2.sqrt();

        let mut out = Vec::with_capacity(steps);
        for h in 1..=steps {
            let mut w_next = self.intercept;
            for (i, &phi) in self.ar.iter().enumerate() {
                if let Some(idx) = w_hist.len().checked_sub(i + 1) {
                    w_next += phi * w_hist[idx];
                }
            }
            for (j, &theta) in self.ma.iter().enumerate() {
                if let Some(idx) = e_hist.len().checked_sub(j + 1) {
                    w_next += theta * e_hist[idx];
                }
            }
            w_hist.push(w_next);
            e_hist.push(0.0); // future innovations are zero in expectation

            let mut level = w_next;
            for tail in tails.iter_mut().rev() {
                level += *tail;
                *tail = level;
            }

            let half_width = 1.96 * sigma * (h as f64).sqrt();
            out.push(Forecast {
                step: h,
                point: level,
                lower: level - half_width,
                upper: level + half_width,
            });
        }

        out
    }
}
