//! Model-facing types: ARIMA orders, predictions, evaluation metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ARIMA (p, d, q) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive order.
    pub p: usize,
    /// Degree of differencing.
    pub d: usize,
    /// Moving-average order.
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

impl FromStr for ArimaOrder {
    type Err = String;

    /// Parse "p,d,q" or "(p,d,q)".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("Invalid ARIMA order: {}", s));
        }
        let parse = |part: &str| {
            part.parse::<usize>()
                .map_err(|_| format!("Invalid ARIMA order component: {}", part))
        };
        Ok(Self::new(parse(parts[0])?, parse(parts[1])?, parse(parts[2])?))
    }
}

/// A forecasted price point for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub symbol: String,
    pub date: NaiveDate,
    pub predicted_price: f64,
    pub confidence_lower: Option<f64>,
    pub confidence_upper: Option<f64>,
    pub model_type: String,
}

/// Evaluation metrics for a trained classifier on one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub symbol: String,
    pub model_type: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub created_at: NaiveDate,
}
