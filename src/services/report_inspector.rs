//! Standalone inspection of a single test record.

use tracing::instrument;

use crate::domain::models::{
    DebugReport, ErrorInfo, FailureLocation, RawTestRecord, TestInfo, TestStatus,
};
use crate::services::analysis_requestor::AnalysisRequestor;
use crate::services::{history_evaluator, stack_trace, stage_classifier};

pub const DEFAULT_NAME: &str = "Unknown Test";
pub const DEFAULT_FULL_NAME: &str = "Unknown Full Name";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_STATUS: &str = "Unknown";
pub const DEFAULT_MESSAGE: &str = "No status message available";
pub const DEFAULT_TRACE: &str = "No stack trace available";
pub const PASSED_SUMMARY: &str = "Test passed successfully. No debugging information needed.";

fn or_default(value: Option<&String>, default: &str) -> String {
    value.map_or_else(|| default.to_string(), Clone::clone)
}

/// Identification block with placeholders for absent fields.
pub fn test_info(record: &RawTestRecord) -> TestInfo {
    let duration_ms = record
        .time
        .as_ref()
        .and_then(|time| time.duration)
        .unwrap_or_default();

    TestInfo {
        name: or_default(record.name.as_ref(), DEFAULT_NAME),
        full_name: or_default(record.full_name.as_ref(), DEFAULT_FULL_NAME),
        description: or_default(record.description.as_ref(), DEFAULT_DESCRIPTION),
        status: or_default(record.status.as_ref(), DEFAULT_STATUS),
        #[allow(clippy::cast_precision_loss)]
        duration_seconds: duration_ms as f64 / 1000.0,
    }
}

/// Build the debug report for one record. Failed and broken records get
/// error details and a cause/fix analysis; anything else gets a summary.
#[instrument(skip_all, fields(test = record.name.as_deref().unwrap_or(DEFAULT_NAME)))]
pub async fn inspect(record: &RawTestRecord, requestor: &AnalysisRequestor) -> DebugReport {
    let info = test_info(record);
    let history = history_evaluator::evaluate(record.history());

    let status = record
        .status
        .as_deref()
        .map_or(TestStatus::Unknown, |status| {
            TestStatus::parse(&status.to_lowercase())
        });
    if !status.is_failure() {
        return DebugReport {
            test_info: info,
            history,
            error_info: None,
            analysis: None,
            summary: Some(PASSED_SUMMARY.to_string()),
        };
    }

    let message = or_default(record.status_message.as_ref(), DEFAULT_MESSAGE);
    let trace = or_default(record.status_trace.as_ref(), DEFAULT_TRACE);
    let location = stack_trace::locate(&trace).unwrap_or_else(FailureLocation::unknown);
    let stage = stage_classifier::classify_record(record);

    let insight = requestor
        .analyze_failure(&info.description, &message, &trace)
        .await
        .value;

    DebugReport {
        test_info: info,
        history,
        error_info: Some(ErrorInfo {
            message,
            location,
            stage,
        }),
        analysis: Some(insight),
        summary: None,
    }
}
