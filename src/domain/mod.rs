//! Domain layer for Jenkins test report triage
//!
//! This module contains the report models, error types and the ports the
//! services depend on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ReportError, ReportResult};
