//! History evaluator: pass rate and consistent-failure detection.

use crate::domain::models::{HistoryItem, HistoryRecord, HistorySummary, TestStatus};

/// Number of most recent runs that must all fail for a test to count as
/// consistently failing.
pub const CONSISTENT_FAILURE_WINDOW: usize = 3;

/// `passed / total * 100` rounded to two decimals; 0 when `total` is 0.
/// Inconsistent statistics with `passed > total` are capped at 100.
#[allow(clippy::cast_precision_loss)]
pub fn pass_rate(total: u64, passed: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = passed.min(total) as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// True when at least [`CONSISTENT_FAILURE_WINDOW`] runs exist and the
/// most recent ones all failed or broke. `items` is most-recent-first.
pub fn is_consistently_failing(items: &[HistoryItem]) -> bool {
    if items.len() < CONSISTENT_FAILURE_WINDOW {
        return false;
    }
    items[..CONSISTENT_FAILURE_WINDOW].iter().all(|item| {
        item.status
            .as_deref()
            .is_some_and(|status| TestStatus::parse(status).is_failure())
    })
}

/// Summarize a record's history section. Absent history yields zeros.
pub fn evaluate(history: Option<&HistoryRecord>) -> HistorySummary {
    let Some(history) = history else {
        return HistorySummary::default();
    };
    let stats = history.statistic.unwrap_or_default();

    HistorySummary {
        total_runs: stats.total,
        pass_rate: pass_rate(stats.total, stats.passed),
        consistently_failing: is_consistently_failing(&history.items),
    }
}
