//! Property tests for aggregation, normalization and history evaluation.

use jenkins_triage::domain::models::{
    fail_percentage, Analysis, ClassAggregate, HistoryItem, Label, RawTestRecord, StageRecord,
};
use jenkins_triage::services::history_evaluator::{is_consistently_failing, pass_rate};
use jenkins_triage::services::stack_trace;
use jenkins_triage::services::ClassAggregator;
use jenkins_triage::services::normalize;
use proptest::prelude::*;

const STATUSES: [&str; 6] = ["passed", "failed", "broken", "skipped", "unknown", "weird"];

fn status_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(STATUSES.to_vec())
}

fn record_strategy() -> impl Strategy<Value = RawTestRecord> {
    (
        prop::option::of(prop::sample::select(vec!["a.A", "b.B", "c.C"])),
        prop::option::of(status_strategy()),
        "[a-z]{1,8}",
        ".{0,40}",
    )
        .prop_map(|(class, status, name, message)| RawTestRecord {
            name: Some(name.clone()),
            full_name: class.map(|c| format!("{c}.{name}")),
            status: status.map(str::to_string),
            status_message: Some(message),
            status_trace: Some(format!("\tat {name}.run({name}.java:7)")),
            labels: class
                .map(|c| vec![Label::new("testClass", c)])
                .unwrap_or_default(),
            test_stage: status.map(|s| StageRecord::new("test", s)),
            ..Default::default()
        })
}

proptest! {
    /// failPercentage is failed/total*100, and 0 for an empty class
    #[test]
    fn prop_fail_percentage_formula(failed in 0u64..10_000, extra in 0u64..10_000) {
        let total = failed + extra;
        let pct = fail_percentage(failed, total);
        if total == 0 {
            prop_assert!(pct.abs() < f64::EPSILON);
        } else {
            #[allow(clippy::cast_precision_loss)]
            let expected = failed as f64 / total as f64 * 100.0;
            prop_assert!((pct - expected).abs() < 1e-9);
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }

    /// Counters stay consistent for any mix of records
    #[test]
    fn prop_aggregate_counters_consistent(records in prop::collection::vec(record_strategy(), 0..60)) {
        let mut aggregator = ClassAggregator::new();
        let mut skipped = 0;
        for (i, record) in records.iter().enumerate() {
            if aggregator.ingest(record, &format!("{i}.json")).is_some() {
                skipped += 1;
            }
        }
        let aggregates = aggregator.into_aggregates();

        let counted: u64 = aggregates.iter().map(|a| a.total_tests).sum();
        prop_assert_eq!(counted as usize + skipped, records.len());
        for aggregate in &aggregates {
            prop_assert!(aggregate.passed + aggregate.failed <= aggregate.total_tests);
            prop_assert_eq!(aggregate.failure_details.len() as u64, aggregate.failed);
            prop_assert!(
                (aggregate.fail_percentage - fail_percentage(aggregate.failed, aggregate.total_tests)).abs()
                    < f64::EPSILON
            );
        }
    }

    /// Normalizing the same record twice gives the same result
    #[test]
    fn prop_normalizer_idempotent(record in record_strategy()) {
        prop_assert_eq!(normalize(&record), normalize(&record));
    }

    /// Serializing and parsing an aggregate gives it back unchanged
    #[test]
    fn prop_aggregate_round_trip(records in prop::collection::vec(record_strategy(), 1..30)) {
        let mut aggregator = ClassAggregator::new();
        for (i, record) in records.iter().enumerate() {
            aggregator.ingest(record, &format!("{i}.json"));
        }
        for mut aggregate in aggregator.into_aggregates() {
            if aggregate.has_failures() {
                aggregate.analysis = Analysis::fallback("round trip");
            }
            let json = serde_json::to_string(&aggregate).unwrap();
            let parsed: ClassAggregate = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed, aggregate);
        }
    }

    /// consistentlyFailing needs at least three entries and looks only at
    /// the first three
    #[test]
    fn prop_consistently_failing(statuses in prop::collection::vec(status_strategy(), 0..8)) {
        let items: Vec<HistoryItem> = statuses.iter().map(|s| HistoryItem::with_status(*s)).collect();
        let expected = statuses.len() >= 3
            && statuses[..3].iter().all(|s| matches!(*s, "failed" | "broken"));
        prop_assert_eq!(is_consistently_failing(&items), expected);
    }

    /// passRate stays within [0, 100] even for inconsistent statistics
    #[test]
    fn prop_pass_rate_in_range(total in 0u64..1_000, passed in 0u64..2_000) {
        let rate = pass_rate(total, passed);
        prop_assert!((0.0..=100.0).contains(&rate));
    }

    /// The locator never panics on arbitrary text
    #[test]
    fn prop_locator_total(trace in "(?s).{0,200}") {
        let _ = stack_trace::locate(&trace);
    }

    /// Any located frame came from a line of the trace
    #[test]
    fn prop_located_line_is_from_trace(
        method in "[a-z]{1,6}(\\.[a-z]{1,6}){0,3}",
        file in "[A-Z][a-z]{0,6}\\.java",
        line in 1u32..5000,
        noise in "[^\n]{0,30}",
    ) {
        let trace = format!("{noise}\n\tat {method}({file}:{line})\n\tat other.Frame(X.java:1)");
        let location = stack_trace::locate(&trace).unwrap();
        prop_assert!(trace.lines().any(|l| l.trim() == location.full_stack_line));
    }
}

#[test]
fn test_consistently_failing_short_histories() {
    for len in 0..3 {
        let items = vec![HistoryItem::with_status("failed"); len];
        assert!(!is_consistently_failing(&items));
    }
}
