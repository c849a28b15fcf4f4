//! Validation and cleaning of raw bar sequences.
//!
//! Transforms one symbol's raw, possibly dirty rows into a valid, sorted,
//! deduplicated bar sequence. The stage is idempotent: running it on its
//! own output changes nothing.

use std::collections::HashSet;

use chrono::NaiveDate;
use stockpipe_core::{PriceBar, RawBar};
use tracing::debug;

/// Counters describing what the cleaning pass did. Logged by callers; a
/// fully-rejected input is a skip condition, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub input_rows: usize,
    pub duplicates_dropped: usize,
    pub forward_filled: usize,
    pub unfillable_dropped: usize,
    pub invalid_price_dropped: usize,
    pub inconsistent_dropped: usize,
    pub output_rows: usize,
}

impl CleanReport {
    pub fn total_dropped(&self) -> usize {
        self.duplicates_dropped
            + self.unfillable_dropped
            + self.invalid_price_dropped
            + self.inconsistent_dropped
    }
}

/// Clean a raw bar sequence, in order:
/// 1. drop exact duplicate (symbol, date) rows, keeping the first seen;
/// 2. sort ascending by date;
/// 3. forward-fill missing OHLC fields from the prior bar's same field
///    (missing volume becomes 0); rows missing a field before any value for
///    it exists are dropped;
/// 4. drop rows with any OHLC <= 0;
/// 5. drop rows violating high >= low, high >= open, high >= close.
pub fn clean_bars(raw: Vec<RawBar>) -> (Vec<PriceBar>, CleanReport) {
    let mut report = CleanReport {
        input_rows: raw.len(),
        ..CleanReport::default()
    };

    // 1. dedupe on identity key
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();
    let mut rows: Vec<RawBar> = Vec::with_capacity(raw.len());
    for row in raw {
        if seen.insert((row.symbol.clone(), row.date)) {
            rows.push(row);
        } else {
            report.duplicates_dropped += 1;
        }
    }

    // 2. sort ascending by date
    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.symbol.cmp(&b.symbol)));

    // 3. forward-fill per field
    let mut last_open = None;
    let mut last_high = None;
    let mut last_low = None;
    let mut last_close = None;

    let mut bars: Vec<PriceBar> = Vec::with_capacity(rows.len());
    for row in rows {
        let had_gap = row.open.is_none()
            || row.high.is_none()
            || row.low.is_none()
            || row.close.is_none();

        let open = row.open.or(last_open);
        let high = row.high.or(last_high);
        let low = row.low.or(last_low);
        let close = row.close.or(last_close);

        let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close) else {
            // nothing earlier to fill from
            report.unfillable_dropped += 1;
            continue;
        };

        if had_gap {
            report.forward_filled += 1;
        }

        last_open = Some(open);
        last_high = Some(high);
        last_low = Some(low);
        last_close = Some(close);

        let bar = PriceBar::new(
            row.symbol,
            row.date,
            open,
            high,
            low,
            close,
            row.volume.unwrap_or(0),
        );

        // 4. positive prices
        if bar.open <= 0.0 || bar.high <= 0.0 || bar.low <= 0.0 || bar.close <= 0.0 {
            report.invalid_price_dropped += 1;
            continue;
        }

        // 5. high dominates low/open/close
        if bar.high < bar.low || bar.high < bar.open || bar.high < bar.close {
            report.inconsistent_dropped += 1;
            continue;
        }

        bars.push(bar);
    }

    report.output_rows = bars.len();
    if report.total_dropped() > 0 || report.forward_filled > 0 {
        debug!(
            input = report.input_rows,
            output = report.output_rows,
            duplicates = report.duplicates_dropped,
            filled = report.forward_filled,
            invalid = report.invalid_price_dropped + report.inconsistent_dropped,
            "cleaned bar sequence"
        );
    }
    (bars, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn raw(date_str: &str, o: f64, h: f64, l: f64, c: f64, v: i64) -> RawBar {
        RawBar::complete("TEST", date(date_str), o, h, l, c, v)
    }

    #[test]
    fn test_duplicates_dropped_keeping_first() {
        let rows = vec![
            raw("2024-01-02", 10.0, 11.0, 9.0, 10.5, 100),
            raw("2024-01-02", 99.0, 99.0, 99.0, 99.0, 999),
            raw("2024-01-03", 10.5, 12.0, 10.0, 11.0, 200),
        ];

        let (bars, report) = clean_bars(rows);

        assert_eq!(report.duplicates_dropped, 1);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 10.5);
    }

    #[test]
    fn test_sorted_ascending_by_date() {
        let rows = vec![
            raw("2024-01-05", 10.0, 11.0, 9.0, 10.0, 100),
            raw("2024-01-02", 10.0, 11.0, 9.0, 10.0, 100),
            raw("2024-01-03", 10.0, 11.0, 9.0, 10.0, 100),
        ];

        let (bars, _) = clean_bars(rows);

        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-02"), date("2024-01-03"), date("2024-01-05")]
        );
    }

    #[test]
    fn test_forward_fill_from_prior_bar() {
        let mut gapped = raw("2024-01-03", 0.0, 0.0, 0.0, 0.0, 0);
        gapped.open = None;
        gapped.close = None;
        gapped.high = Some(11.5);
        gapped.low = Some(9.5);
        gapped.volume = None;

        let rows = vec![raw("2024-01-02", 10.0, 11.0, 9.0, 10.5, 100), gapped];

        let (bars, report) = clean_bars(rows);

        assert_eq!(report.forward_filled, 1);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].open, 10.0);
        assert_eq!(bars[1].close, 10.5);
        assert_eq!(bars[1].volume, 0);
    }

    #[test]
    fn test_leading_gap_is_dropped() {
        let mut gapped = raw("2024-01-02", 0.0, 0.0, 0.0, 0.0, 0);
        gapped.close = None;

        let rows = vec![gapped, raw("2024-01-03", 10.0, 11.0, 9.0, 10.5, 100)];

        let (bars, report) = clean_bars(rows);

        assert_eq!(report.unfillable_dropped, 1);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date("2024-01-03"));
    }

    #[test]
    fn test_nonpositive_prices_dropped() {
        let rows = vec![
            raw("2024-01-02", 10.0, 11.0, 9.0, 10.5, 100),
            raw("2024-01-03", -1.0, 11.0, 9.0, 10.5, 100),
            raw("2024-01-04", 10.0, 11.0, 0.0, 10.5, 100),
        ];

        let (bars, report) = clean_bars(rows);

        assert_eq!(report.invalid_price_dropped, 2);
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn test_high_consistency_enforced() {
        let rows = vec![
            raw("2024-01-02", 10.0, 11.0, 9.0, 10.5, 100),
            raw("2024-01-03", 10.0, 9.5, 9.0, 9.2, 100),  // high < open
            raw("2024-01-04", 10.0, 11.0, 12.0, 10.5, 100), // high < low
            raw("2024-01-05", 10.0, 11.0, 9.0, 11.5, 100),  // high < close
        ];

        let (bars, report) = clean_bars(rows);

        assert_eq!(report.inconsistent_dropped, 3);
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn test_all_outputs_satisfy_invariants() {
        let rows = vec![
            raw("2024-01-02", 10.0, 11.0, 9.0, 10.5, 100),
            raw("2024-01-03", -5.0, 11.0, 9.0, 10.5, 100),
            raw("2024-01-04", 10.0, 9.0, 9.5, 8.0, 100),
            raw("2024-01-05", 10.0, 12.0, 9.0, 11.5, 100),
        ];

        let (bars, _) = clean_bars(rows);

        assert!(!bars.is_empty());
        for bar in &bars {
            assert!(bar.is_valid());
        }
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let mut gapped = raw("2024-01-04", 0.0, 0.0, 0.0, 0.0, 0);
        gapped.open = None;
        gapped.volume = None;

        let rows = vec![
            raw("2024-01-03", 10.0, 11.0, 9.0, 10.5, 100),
            raw("2024-01-03", 10.0, 11.0, 9.0, 10.5, 100),
            raw("2024-01-02", 10.0, 11.0, 9.0, 10.5, 100),
            gapped,
            raw("2024-01-05", -1.0, 11.0, 9.0, 10.5, 100),
        ];

        let (first, _) = clean_bars(rows);
        let raw_again: Vec<RawBar> = first
            .iter()
            .map(|b| RawBar::complete(b.symbol.clone(), b.date, b.open, b.high, b.low, b.close, b.volume))
            .collect();
        let (second, report) = clean_bars(raw_again);

        assert_eq!(first, second);
        assert_eq!(report.total_dropped(), 0);
        assert_eq!(report.forward_filled, 0);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let (bars, report) = clean_bars(Vec::new());
        assert!(bars.is_empty());
        assert_eq!(report.output_rows, 0);
    }
}
