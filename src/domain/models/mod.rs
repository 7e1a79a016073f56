//! Domain models for test report triage.

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod history;
pub mod outcome;
pub mod record;
pub mod report;
pub mod stage;

pub use aggregate::{fail_percentage, ClassAggregate};
pub use analysis::{Analysis, Cause, Confidence, FailureInsight, Priority, Solution};
pub use config::{
    AnalysisConfig, Config, GeneratorConfig, LoggingConfig, RateLimitConfig, ThrottleStrategy,
};
pub use history::HistorySummary;
pub use outcome::{FailureDetail, FailureLocation, TestOutcome, TestStatus};
pub use record::{
    HistoryItem, HistoryRecord, HistoryStatistic, Label, RawTestRecord, StageRecord, TimeRecord,
};
pub use report::{BatchReport, DebugReport, ErrorInfo, SkipReason, SkippedRecord, TestInfo};
pub use stage::{Phase, StageInfo};
