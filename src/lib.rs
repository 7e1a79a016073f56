//! jenkins-triage - test report triage for Jenkins/Allure results
//!
//! Reads Allure-style test result records, groups them by test class,
//! pinpoints where each failure happened and asks a generative model for a
//! root-cause analysis, falling back to a fixed analysis whenever the model
//! is unavailable or its reply is unusable.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Report models, errors and port traits
//! - **Service Layer** (`services`): The triage pipeline
//! - **Infrastructure Layer** (`infrastructure`): Gemini client, rate limiting, config, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use jenkins_triage::domain::ports::UnconfiguredGenerator;
//! use jenkins_triage::services::{AnalysisRequestor, BatchMode, BatchProcessor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let requestor = AnalysisRequestor::new(Arc::new(UnconfiguredGenerator));
//!     let report = BatchProcessor::new(requestor, BatchMode::PerFile)
//!         .process_paths(&["allure-results/a-result.json"])
//!         .await;
//!     println!("{}", report.success_message);
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Analysis, BatchReport, ClassAggregate, Config, DebugReport, FailureDetail, RawTestRecord,
    TestStatus,
};
pub use domain::ports::{GenerationError, RateLimitPolicy, TextGenerator};
pub use domain::{ReportError, ReportResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AnalysisRequestor, BatchMode, BatchProcessor};
