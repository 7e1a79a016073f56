//! Report normalizer.
//!
//! Turns one raw record into a canonical [`TestOutcome`] keyed by its test
//! class. Records without a class or status cannot be aggregated; they come
//! back as a reason-tagged skip instead of an error.

use crate::domain::models::{
    FailureDetail, RawTestRecord, SkipReason, TestOutcome, TestStatus,
};
use crate::services::{history_evaluator, stack_trace, stage_classifier};

/// An outcome together with its grouping key.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedOutcome {
    pub class_name: String,
    pub outcome: TestOutcome,
}

/// Result of normalizing one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Outcome(ClassifiedOutcome),
    Skipped(SkipReason),
}

/// Build the failure detail for a failed or broken record.
///
/// `test_file` is left empty; the aggregator stamps it.
pub fn failure_detail(record: &RawTestRecord) -> FailureDetail {
    let trace = record.status_trace.clone().unwrap_or_default();
    FailureDetail {
        message: record.status_message.clone().unwrap_or_default(),
        location: stack_trace::locate(&trace),
        trace,
        test_method: record.name.clone().unwrap_or_default(),
        full_test_name: record.full_name.clone().unwrap_or_default(),
        test_file: String::new(),
        stage: Some(stage_classifier::classify_record(record)),
        history: Some(history_evaluator::evaluate(record.history())),
    }
}

/// Normalize one record. Pure: the same record always yields the same
/// result.
pub fn normalize(record: &RawTestRecord) -> Normalized {
    let Some(class_name) = record.test_class() else {
        return Normalized::Skipped(SkipReason::MissingGroupingKey);
    };
    let Some(raw_status) = record.status.as_deref() else {
        return Normalized::Skipped(SkipReason::MissingStatus);
    };

    let status = TestStatus::parse(raw_status);
    let failure_detail = status.is_failure().then(|| failure_detail(record));

    Normalized::Outcome(ClassifiedOutcome {
        class_name: class_name.to_string(),
        outcome: TestOutcome {
            test_method: record.name.clone().unwrap_or_default(),
            full_test_name: record.full_name.clone().unwrap_or_default(),
            status: status.normalized(),
            failure_detail,
        },
    })
}
