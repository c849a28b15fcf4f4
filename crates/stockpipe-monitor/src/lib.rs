//! Monitoring: logging setup and human-readable reports.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{render_batch_report, render_coverage};
