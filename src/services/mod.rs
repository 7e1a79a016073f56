//! Service layer
//!
//! The triage pipeline: normalize records, locate failures, classify
//! stages, evaluate history, aggregate by class and request analyses.

pub mod aggregate_importer;
pub mod aggregator;
pub mod analysis_requestor;
pub mod batch_processor;
pub mod history_evaluator;
pub mod normalizer;
pub mod prompts;
pub mod report_inspector;
pub mod response_parser;
pub mod stack_trace;
pub mod stage_classifier;

pub use aggregator::ClassAggregator;
pub use analysis_requestor::{AnalysisRequestor, CallState, ClassAnalysis, Resolved};
pub use batch_processor::{BatchMode, BatchProcessor, ReportFile};
pub use normalizer::{normalize, ClassifiedOutcome, Normalized};
