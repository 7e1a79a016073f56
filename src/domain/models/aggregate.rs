use serde::{Deserialize, Serialize};

use super::analysis::Analysis;
use super::outcome::{FailureDetail, TestOutcome, TestStatus};

/// Per-class rollup of test outcomes.
///
/// Serialized with the field names the results store has always used
/// (`test_name` holds the class name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAggregate {
    #[serde(rename = "test_name")]
    pub class_name: String,
    pub total_tests: u64,
    pub passed: u64,
    pub failed: u64,
    pub fail_percentage: f64,
    pub failure_details: Vec<FailureDetail>,
    pub analysis: Analysis,
}

impl ClassAggregate {
    /// Zero-initialized aggregate for a newly seen class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            total_tests: 0,
            passed: 0,
            failed: 0,
            fail_percentage: 0.0,
            failure_details: Vec::new(),
            analysis: Analysis::empty(),
        }
    }

    /// Count one outcome. A failure detail is kept only for failed
    /// outcomes and is stamped with `source`.
    pub fn record(&mut self, outcome: TestOutcome, source: &str) {
        self.total_tests += 1;
        match outcome.status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed | TestStatus::Broken => {
                self.failed += 1;
                if let Some(detail) = outcome.failure_detail {
                    self.failure_details.push(detail.stamped(source));
                }
            }
            _ => {}
        }
    }

    /// Recompute `fail_percentage` from the counters.
    pub fn refresh_fail_percentage(&mut self) {
        self.fail_percentage = fail_percentage(self.failed, self.total_tests);
    }

    pub fn has_failures(&self) -> bool {
        !self.failure_details.is_empty()
    }
}

/// `failed / total * 100`, or 0 for an empty class.
#[allow(clippy::cast_precision_loss)]
pub fn fail_percentage(failed: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: TestStatus) -> TestOutcome {
        TestOutcome {
            test_method: "m".to_string(),
            full_test_name: "a.B.m".to_string(),
            status,
            failure_detail: None,
        }
    }

    #[test]
    fn test_record_counts() {
        let mut agg = ClassAggregate::new("a.B");
        agg.record(outcome(TestStatus::Passed), "1.json");
        agg.record(outcome(TestStatus::Failed), "2.json");
        agg.record(outcome(TestStatus::Skipped), "3.json");
        agg.refresh_fail_percentage();

        assert_eq!(agg.total_tests, 3);
        assert_eq!(agg.passed, 1);
        assert_eq!(agg.failed, 1);
        assert!((agg.fail_percentage - 100.0 / 3.0).abs() < f64::EPSILON);
        // no detail supplied, so nothing to analyze
        assert!(!agg.has_failures());
    }

    #[test]
    fn test_fail_percentage_zero_total() {
        assert!(fail_percentage(0, 0).abs() < f64::EPSILON);
        let mut agg = ClassAggregate::new("a.B");
        agg.refresh_fail_percentage();
        assert!(agg.fail_percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn test_serialized_field_names() {
        let agg = ClassAggregate::new("com.acme.LoginTest");
        let value = serde_json::to_value(&agg).unwrap();
        assert_eq!(value["test_name"], "com.acme.LoginTest");
        assert_eq!(value["total_tests"], 0);
        assert_eq!(value["analysis"]["causes"], serde_json::json!([]));
        assert!(value.get("class_name").is_none());
    }
}
