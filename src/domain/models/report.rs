//! Top-level results handed to callers (CLI, results store).

use serde::{Deserialize, Serialize};

use super::aggregate::ClassAggregate;
use super::analysis::FailureInsight;
use super::history::HistorySummary;
use super::outcome::FailureLocation;
use super::stage::StageInfo;

/// Why a record was left out of aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No `testClass` label.
    MissingGroupingKey,
    /// No `status` field.
    MissingStatus,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingGroupingKey => f.write_str("missing testClass label"),
            Self::MissingStatus => f.write_str("missing status"),
        }
    }
}

/// A dropped record and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub source: String,
    pub reason: SkipReason,
}

/// Result of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub aggregates: Vec<ClassAggregate>,
    pub total_files: usize,
    pub processed_files: usize,
    /// One diagnostic per file (or entry) that could not be used.
    pub failed_files: Vec<String>,
    pub skipped_records: Vec<SkippedRecord>,
    pub success_message: String,
}

impl BatchReport {
    pub fn summary_message(processed: usize, total: usize) -> String {
        format!("Successfully processed {processed} out of {total} files")
    }
}

/// Basic identification of the inspected test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestInfo {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub status: String,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    pub location: FailureLocation,
    pub stage: StageInfo,
}

/// Standalone debug report for a single test record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugReport {
    pub test_info: TestInfo,
    pub history: HistorySummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_info: Option<ErrorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<FailureInsight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
