//! Analysis requestor.
//!
//! Sends one prompt per test class (or per single failure) to the text
//! generator and turns the reply into a structured result. This is a
//! total boundary: transport errors, timeouts and unusable replies all
//! end in a well-formed fallback, never in an error.
//!
//! Each call moves through `Pending -> Sent -> {ParsedOk | ParsedFallback}
//! -> Done`. There is exactly one attempt per call.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::models::{Analysis, AnalysisConfig, FailureDetail, FailureInsight};
use crate::domain::ports::{GenerationError, RateLimitPolicy, TextGenerator, Unthrottled};
use crate::services::prompts::{self, CombinedFailures};
use crate::services::response_parser::{self, insight_strategies};

/// Lifecycle of one analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Pending,
    Sent,
    ParsedOk,
    ParsedFallback,
    Done,
}

impl CallState {
    fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Sent | Self::ParsedFallback)
                | (Self::Sent, Self::ParsedOk | Self::ParsedFallback)
                | (Self::ParsedOk | Self::ParsedFallback, Self::Done)
        )
    }
}

/// Tracks a call's state transitions.
#[derive(Debug)]
struct CallTracker<'a> {
    subject: &'a str,
    state: CallState,
    resolution: Option<CallState>,
}

impl<'a> CallTracker<'a> {
    const fn new(subject: &'a str) -> Self {
        Self {
            subject,
            state: CallState::Pending,
            resolution: None,
        }
    }

    fn advance(&mut self, next: CallState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid transition {:?} -> {next:?}",
            self.state
        );
        debug!(subject = self.subject, from = ?self.state, to = ?next, "analysis call transition");
        if matches!(next, CallState::ParsedOk | CallState::ParsedFallback) {
            self.resolution = Some(next);
        }
        self.state = next;
    }

    fn finish(mut self) -> CallState {
        self.advance(CallState::Done);
        self.resolution.unwrap_or(CallState::ParsedFallback)
    }
}

/// A value produced by the requestor and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    /// `ParsedOk` or `ParsedFallback`.
    pub resolution: CallState,
    /// Why the fallback was used, when it was.
    pub fallback_reason: Option<String>,
}

impl<T> Resolved<T> {
    pub fn is_fallback(&self) -> bool {
        self.resolution == CallState::ParsedFallback
    }
}

/// Result of a class analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassAnalysis {
    pub analysis: Analysis,
    pub resolution: CallState,
    pub fallback_reason: Option<String>,
}

impl From<Resolved<Analysis>> for ClassAnalysis {
    fn from(resolved: Resolved<Analysis>) -> Self {
        Self {
            analysis: resolved.value,
            resolution: resolved.resolution,
            fallback_reason: resolved.fallback_reason,
        }
    }
}

/// Builds prompts, calls the generator and parses replies.
#[derive(Clone)]
pub struct AnalysisRequestor {
    generator: Arc<dyn TextGenerator>,
    rate_limit: Arc<dyn RateLimitPolicy>,
    timeout: Duration,
    max_section_chars: usize,
}

impl AnalysisRequestor {
    /// Requestor with no throttling and default timeout and budget.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            rate_limit: Arc::new(Unthrottled),
            timeout: Duration::from_secs(60),
            max_section_chars: AnalysisConfig::default().max_section_chars,
        }
    }

    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: Arc<dyn RateLimitPolicy>) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_max_section_chars(mut self, max_section_chars: usize) -> Self {
        self.max_section_chars = max_section_chars;
        self
    }

    /// One generator round-trip, bounded by the timeout and wrapped in the
    /// rate-limit hooks. `after_call` runs whether or not the call succeeded.
    async fn call(&self, prompt: &str) -> Result<String, GenerationError> {
        self.rate_limit.before_call().await;
        let result = match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await
        {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout.as_secs())),
        };
        self.rate_limit.after_call().await;
        result
    }

    /// Analyze the merged failures of one class. Always returns a
    /// well-formed analysis.
    #[instrument(skip(self, details), fields(generator = self.generator.generator_id(), failures = details.len()))]
    pub async fn analyze_class(&self, class_name: &str, details: &[FailureDetail]) -> ClassAnalysis {
        let mut tracker = CallTracker::new(class_name);

        if details.is_empty() {
            tracker.advance(CallState::ParsedFallback);
            return fallback(tracker, "No failure details to analyze".to_string(), Analysis::fallback).into();
        }

        let combined = CombinedFailures::from_details(details)
            .within_budget(self.max_section_chars, class_name);
        let prompt = prompts::class_analysis_prompt(&combined);

        tracker.advance(CallState::Sent);
        let reply = match self.call(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(class = class_name, error = %err, "generation failed, using fallback analysis");
                tracker.advance(CallState::ParsedFallback);
                return fallback(tracker, err.to_string(), Analysis::fallback).into();
            }
        };

        match response_parser::parse_analysis(&reply) {
            Ok(analysis) => {
                tracker.advance(CallState::ParsedOk);
                Resolved {
                    value: analysis,
                    resolution: tracker.finish(),
                    fallback_reason: None,
                }
                .into()
            }
            Err(err) => {
                warn!(class = class_name, error = %err, "unusable reply, using fallback analysis");
                tracker.advance(CallState::ParsedFallback);
                fallback(tracker, err.to_string(), Analysis::fallback).into()
            }
        }
    }

    /// Analyze a single failure in isolation. Always returns a cause/fix
    /// pair.
    #[instrument(skip_all, fields(generator = self.generator.generator_id()))]
    pub async fn analyze_failure(
        &self,
        description: &str,
        message: &str,
        trace: &str,
    ) -> Resolved<FailureInsight> {
        let mut tracker = CallTracker::new("single failure");
        let prompt = prompts::single_failure_prompt(description, message, trace);

        tracker.advance(CallState::Sent);
        let reply = match self.call(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "generation failed, using default insight");
                tracker.advance(CallState::ParsedFallback);
                return fallback(tracker, err.to_string(), |_| FailureInsight::undetermined());
            }
        };

        let strategies = insight_strategies();
        if let Some((insight, strategy)) = response_parser::extract_first(&reply, &strategies) {
            debug!(strategy, "insight extracted");
            tracker.advance(CallState::ParsedOk);
            return Resolved {
                value: insight,
                resolution: tracker.finish(),
                fallback_reason: None,
            };
        }

        warn!("no extraction strategy matched the reply, using default insight");
        tracker.advance(CallState::ParsedFallback);
        fallback(
            tracker,
            "Could not extract cause and fix from response".to_string(),
            |_| FailureInsight::undetermined(),
        )
    }
}

fn fallback<T>(tracker: CallTracker<'_>, reason: String, build: impl FnOnce(String) -> T) -> Resolved<T> {
    let value = build(reason.clone());
    Resolved {
        value,
        resolution: tracker.finish(),
        fallback_reason: Some(reason),
    }
}
