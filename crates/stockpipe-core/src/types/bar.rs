//! Daily OHLCV bar types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A bar as returned by a provider, before validation. Providers
/// occasionally report partial rows, so every price field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}

impl RawBar {
    /// A fully-populated raw bar.
    pub fn complete(
        symbol: impl Into<String>,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }
}

/// A validated daily OHLCV bar. Identity key is (symbol, date).
///
/// Invariants (enforced by the cleaning stage, checked by [`is_valid`]):
/// all OHLC values are positive, `high >= max(open, close, low)`, and
/// `volume >= 0`.
///
/// [`is_valid`]: PriceBar::is_valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    pub fn new(
        symbol: impl Into<String>,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the OHLCV invariants.
    pub fn is_valid(&self) -> bool {
        self.open > 0.0
            && self.high > 0.0
            && self.low > 0.0
            && self.close > 0.0
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.volume >= 0
    }

    /// The bar's intraday range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Column extraction over a date-sorted slice of bars.
pub trait BarColumns {
    fn opens(&self) -> Vec<f64>;
    fn highs(&self) -> Vec<f64>;
    fn lows(&self) -> Vec<f64>;
    fn closes(&self) -> Vec<f64>;
    fn volumes(&self) -> Vec<f64>;
}

impl BarColumns for [PriceBar] {
    fn opens(&self) -> Vec<f64> {
        self.iter().map(|b| b.open).collect()
    }

    fn highs(&self) -> Vec<f64> {
        self.iter().map(|b| b.high).collect()
    }

    fn lows(&self) -> Vec<f64> {
        self.iter().map(|b| b.low).collect()
    }

    fn closes(&self) -> Vec<f64> {
        self.iter().map(|b| b.close).collect()
    }

    fn volumes(&self) -> Vec<f64> {
        self.iter().map(|b| b.volume as f64).collect()
    }
}
