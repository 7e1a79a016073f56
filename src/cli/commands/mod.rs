//! CLI command implementations

pub mod analyze;
pub mod config;
pub mod import;
pub mod inspect;

use anyhow::Result;
use std::time::Duration;

use crate::domain::models::Config;
use crate::infrastructure::{gemini, rate_limiter};
use crate::services::AnalysisRequestor;

/// Requestor wired to the configured generator and rate limit policy.
pub fn build_requestor(config: &Config) -> Result<AnalysisRequestor> {
    let generator = gemini::build_generator(&config.generator)?;
    Ok(AnalysisRequestor::new(generator)
        .with_rate_limit(rate_limiter::from_config(&config.rate_limit))
        .with_timeout(Duration::from_secs(config.generator.timeout_secs))
        .with_max_section_chars(config.analysis.max_section_chars))
}
