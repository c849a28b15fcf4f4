//! Backfill window planning.

use chrono::{Duration, NaiveDate};

/// Bounds on how far back a sync may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindowConfig {
    /// Hard cap on the requested window, bounded by provider history.
    pub max_lookback_days: i64,
    /// Extra days past the gap, tolerating provider reporting lag and
    /// weekend/holiday gaps.
    pub buffer_days: i64,
}

impl Default for SyncWindowConfig {
    fn default() -> Self {
        Self {
            max_lookback_days: 365,
            buffer_days: 2,
        }
    }
}

/// What a sync pass should request from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPlan {
    /// Store already holds today's bar; nothing to fetch.
    UpToDate,
    /// Fetch the inclusive date window `[start, end]`.
    Fetch { start: NaiveDate, end: NaiveDate },
}

impl SyncPlan {
    /// Inclusive day count of the planned fetch, or 0 when up to date.
    pub fn span_days(&self) -> i64 {
        match self {
            SyncPlan::UpToDate => 0,
            SyncPlan::Fetch { start, end } => (*end - *start).num_days() + 1,
        }
    }
}

/// Compute the minimal fetch window for a symbol.
///
/// No stored state requests the full lookback. A store current as of today
/// is a no-op unless forced. Otherwise the window covers the gap plus the
/// buffer, capped at the lookback, always ending today.
pub fn plan_window(
    latest_stored: Option<NaiveDate>,
    today: NaiveDate,
    config: SyncWindowConfig,
    force: bool,
) -> SyncPlan {
    let days = match latest_stored {
        None => config.max_lookback_days,
        Some(latest) => {
            let days_since = (today - latest).num_days().max(0);
            if days_since == 0 && !force {
                return SyncPlan::UpToDate;
            }
            (days_since + config.buffer_days).min(config.max_lookback_days)
        }
    };

    SyncPlan::Fetch {
        start: today - Duration::days(days - 1),
        end: today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_gap_plus_buffer() {
        let today = date("2024-03-15");
        let latest = Some(date("2024-03-12")); // 3 days behind

        let plan = plan_window(latest, today, SyncWindowConfig::default(), false);

        assert_eq!(plan.span_days(), 5); // 3 + 2 buffer
        assert_eq!(
            plan,
            SyncPlan::Fetch {
                start: date("2024-03-11"),
                end: today
            }
        );
    }

    #[test]
    fn test_current_store_is_noop() {
        let today = date("2024-03-15");
        let plan = plan_window(Some(today), today, SyncWindowConfig::default(), false);
        assert_eq!(plan, SyncPlan::UpToDate);
    }

    #[test]
    fn test_force_refetches_buffer_window() {
        let today = date("2024-03-15");
        let plan = plan_window(Some(today), today, SyncWindowConfig::default(), true);

        assert_eq!(plan.span_days(), 2); // buffer only
        assert!(matches!(plan, SyncPlan::Fetch { end, .. } if end == today));
    }

    #[test]
    fn test_fresh_symbol_gets_full_lookback() {
        let today = date("2024-03-15");
        let plan = plan_window(None, today, SyncWindowConfig::default(), false);

        assert_eq!(plan.span_days(), 365);
        assert!(matches!(plan, SyncPlan::Fetch { end, .. } if end == today));
    }

    #[test]
    fn test_long_gap_capped_at_lookback() {
        let today = date("2024-03-15");
        let latest = Some(date("2020-01-01"));

        let plan = plan_window(latest, today, SyncWindowConfig::default(), false);

        assert_eq!(plan.span_days(), 365);
    }

    #[test]
    fn test_future_dated_row_treated_as_current() {
        let today = date("2024-03-15");
        let latest = Some(date("2024-03-20"));

        let plan = plan_window(latest, today, SyncWindowConfig::default(), false);

        assert_eq!(plan, SyncPlan::UpToDate);
    }
}
