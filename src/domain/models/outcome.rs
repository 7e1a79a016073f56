use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::history::HistorySummary;
use super::stage::StageInfo;

/// Placeholder used wherever a location component cannot be determined.
pub const UNKNOWN: &str = "Unknown";

/// Test execution status.
///
/// Closed set matching the statuses Allure emits. Strings outside the set
/// parse as [`TestStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Broken,
    Skipped,
    Unknown,
}

impl TestStatus {
    /// Parse a raw status string. Matching is exact and lowercase, as the
    /// reports write it.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "broken" => Self::Broken,
            "skipped" => Self::Skipped,
            _ => Self::Unknown,
        }
    }

    /// `failed` and `broken` both count as failures.
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Broken)
    }

    /// Collapse `broken` into `failed`; every other status passes through.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self {
            Self::Broken => Self::Failed,
            other => other,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Broken => "broken",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Source position of a failure, taken from the first usable stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureLocation {
    pub file: String,
    /// Kept as text: some runtimes emit non-numeric markers here.
    pub line: String,
    pub method: String,
    pub full_stack_line: String,
}

impl FailureLocation {
    /// Location with every component set to "Unknown".
    pub fn unknown() -> Self {
        Self {
            file: UNKNOWN.to_string(),
            line: UNKNOWN.to_string(),
            method: UNKNOWN.to_string(),
            full_stack_line: String::new(),
        }
    }
}

/// Diagnostics attached to one failed test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub message: String,
    pub trace: String,
    #[serde(rename = "failure_location")]
    pub location: Option<FailureLocation>,
    pub test_method: String,
    pub full_test_name: String,
    /// Name of the report file the failure came from; stamped during
    /// aggregation.
    #[serde(default)]
    pub test_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistorySummary>,
}

impl FailureDetail {
    /// Copy of this detail tagged with its source file.
    #[must_use]
    pub fn stamped(mut self, test_file: impl Into<String>) -> Self {
        self.test_file = test_file.into();
        self
    }
}

/// Canonical outcome of one test record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub test_method: String,
    pub full_test_name: String,
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_detail: Option<FailureDetail>,
}
