//! Domain types shared across pipeline stages.

mod bar;
mod clean;
mod label;
mod model;
mod news;

pub use bar::{BarColumns, PriceBar, RawBar};
pub use clean::CleanBar;
pub use label::LabeledBar;
pub use model::{ArimaOrder, ModelMetrics, Prediction};
pub use news::{DailySentiment, NewsItem, SymbolCoverage};
