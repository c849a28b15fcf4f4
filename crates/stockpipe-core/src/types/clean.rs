//! Feature-engineered bar type.

use serde::{Deserialize, Serialize};

use super::PriceBar;

/// A clean bar: a validated [`PriceBar`] plus derived rolling features.
///
/// Every rolling feature is `None` at positions where the trailing window is
/// not yet full; a computed value of zero is always `Some(0.0)`, never
/// conflated with "absent". The price-range columns need no history and are
/// defined at every index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanBar {
    #[serde(flatten)]
    pub bar: PriceBar,
    /// 5-period moving average of close.
    pub ma_5: Option<f64>,
    /// 10-period moving average of close.
    pub ma_10: Option<f64>,
    /// 20-period moving average of close.
    pub ma_20: Option<f64>,
    /// Day-over-day close change, in percent. `None` on the first bar.
    pub daily_return: Option<f64>,
    /// High minus low.
    pub price_range: f64,
    /// Range as a percentage of close.
    pub price_range_pct: f64,
    /// 5-period moving average of volume.
    pub volume_ma_5: Option<f64>,
    /// Rolling sample standard deviation of `daily_return`, 5 periods.
    pub volatility_5: Option<f64>,
    /// Rolling sample standard deviation of `daily_return`, 10 periods.
    pub volatility_10: Option<f64>,
    /// 14-period Relative Strength Index, in [0, 100].
    pub rsi: Option<f64>,
}

impl CleanBar {
    /// True when every rolling feature has enough history to be defined.
    pub fn features_complete(&self) -> bool {
        self.ma_5.is_some()
            && self.ma_10.is_some()
            && self.ma_20.is_some()
            && self.daily_return.is_some()
            && self.volume_ma_5.is_some()
            && self.volatility_5.is_some()
            && self.volatility_10.is_some()
            && self.rsi.is_some()
    }
}
