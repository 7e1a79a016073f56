//! Stage classifier.
//!
//! Setup failures mask everything after them, so stages are checked in
//! execution order: before stages, the test body, then after stages.

use crate::domain::models::{Phase, RawTestRecord, StageInfo, StageRecord, TestStatus};
use crate::domain::models::outcome::UNKNOWN;

/// Name reported for a failure in the test body itself.
pub const TEST_EXECUTION: &str = "Test Execution";

fn has_failed(stage: &StageRecord) -> bool {
    stage
        .status
        .as_deref()
        .is_some_and(|status| TestStatus::parse(status) == TestStatus::Failed)
}

fn stage_name(stage: &StageRecord) -> String {
    stage.name.clone().unwrap_or_else(|| UNKNOWN.to_string())
}

/// Determine the phase in which the record failed.
pub fn classify(
    before_stages: &[StageRecord],
    test_stage: Option<&StageRecord>,
    after_stages: &[StageRecord],
) -> StageInfo {
    if let Some(stage) = before_stages.iter().find(|s| has_failed(s)) {
        return StageInfo::new(stage_name(stage), Phase::Setup);
    }

    if test_stage.is_some_and(has_failed) {
        return StageInfo::new(TEST_EXECUTION, Phase::Test);
    }

    if let Some(stage) = after_stages.iter().find(|s| has_failed(s)) {
        return StageInfo::new(stage_name(stage), Phase::Teardown);
    }

    StageInfo::unknown()
}

/// [`classify`] applied to a record's stage sections.
pub fn classify_record(record: &RawTestRecord) -> StageInfo {
    classify(
        &record.before_stages,
        record.test_stage.as_ref(),
        &record.after_stages,
    )
}
