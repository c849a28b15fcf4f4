//! Plain-text report rendering for CLI output.

use std::fmt::Write;

use chrono::NaiveDate;
use stockpipe_core::SymbolCoverage;
use stockpipe_sync::{BatchReport, SyncOutcome};

/// Render a batch sync report as an aligned table plus totals.
pub fn render_batch_report(report: &BatchReport) -> String {
    let mut out = String::new();

    for result in &report.results {
        let status = match &result.outcome {
            Ok(SyncOutcome::Updated { rows }) => format!("updated ({} rows)", rows),
            Ok(SyncOutcome::AlreadyCurrent) => "up to date".to_string(),
            Ok(SyncOutcome::NoData) => "no data".to_string(),
            Err(reason) => format!("FAILED: {}", reason),
        };
        let _ = writeln!(out, "{:<8} {}", result.symbol, status);
    }

    let _ = writeln!(
        out,
        "\n{}/{} symbols succeeded, {} failed, {} rows written",
        report.succeeded(),
        report.results.len(),
        report.failed(),
        report.rows_written()
    );

    out
}

/// Render per-symbol data coverage, flagging stale symbols.
pub fn render_coverage(coverage: &[SymbolCoverage], today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>8} {:>6}",
        "symbol", "earliest", "latest", "rows", "stale"
    );

    for c in coverage {
        let stale = c.days_stale(today);
        let marker = if stale > 1 { " *" } else { "" };
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>10} {:>8} {:>5}d{}",
            c.symbol, c.earliest, c.latest, c.row_count, stale, marker
        );
    }

    let stale_count = coverage.iter().filter(|c| c.days_stale(today) > 1).count();
    if stale_count > 0 {
        let _ = writeln!(out, "\n{} symbols need updates", stale_count);
    }

    out
}
