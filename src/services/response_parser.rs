//! Defensive parsing of model replies.
//!
//! Replies are free text that usually, but not always, contain a JSON
//! object. Extraction runs an ordered list of strategies; each strategy is
//! total (it never panics or errors, it only declines), and the first one
//! that produces a value wins.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::models::{Analysis, FailureInsight};
use crate::services::prompts::truncate_chars;

/// Maximum characters kept per field by the keyword scan.
pub const KEYWORD_FIELD_LIMIT: usize = 200;

/// Why a reply could not be turned into a structured value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseFormatError {
    #[error("No valid JSON found in response")]
    NoJsonObject,

    #[error("Invalid JSON in response: {0}")]
    InvalidJson(String),

    #[error("Analysis must contain at least one cause and one solution")]
    EmptyAnalysis,
}

/// The substring from the first `{` to the last `}`, if both exist in
/// that order.
pub fn json_object_span(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

/// Parse a class analysis out of a reply.
///
/// Fields are validated by deserialization: unknown confidence or priority
/// levels, missing fields and empty cause/solution lists are all errors.
pub fn parse_analysis(reply: &str) -> Result<Analysis, ResponseFormatError> {
    let span = json_object_span(reply).ok_or(ResponseFormatError::NoJsonObject)?;
    let analysis: Analysis = serde_json::from_str(span)
        .map_err(|e| ResponseFormatError::InvalidJson(e.to_string()))?;
    if !analysis.is_well_formed() {
        return Err(ResponseFormatError::EmptyAnalysis);
    }
    Ok(analysis)
}

/// One way of extracting a value from a reply.
pub trait ExtractionStrategy<T>: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when this strategy does not apply to the reply.
    fn extract(&self, reply: &str) -> Option<T>;
}

/// Run `strategies` in order; the first value produced wins.
pub fn extract_first<T>(
    reply: &str,
    strategies: &[&dyn ExtractionStrategy<T>],
) -> Option<(T, &'static str)> {
    strategies
        .iter()
        .find_map(|strategy| strategy.extract(reply).map(|value| (value, strategy.name())))
}

#[derive(Debug, Deserialize)]
struct InsightFields {
    #[serde(default)]
    possible_cause: Option<serde_json::Value>,
    #[serde(default)]
    possible_fix: Option<serde_json::Value>,
}

fn field_text(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Parse the JSON object between the first `{` and last `}`. A missing
/// field falls back to its "cannot determine" text.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonInsightStrategy;

impl ExtractionStrategy<FailureInsight> for JsonInsightStrategy {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extract(&self, reply: &str) -> Option<FailureInsight> {
        let span = json_object_span(reply)?;
        let fields: InsightFields = serde_json::from_str(span).ok()?;
        Some(FailureInsight {
            possible_cause: field_text(fields.possible_cause)
                .unwrap_or_else(|| FailureInsight::DEFAULT_CAUSE.to_string()),
            possible_fix: field_text(fields.possible_fix)
                .unwrap_or_else(|| FailureInsight::DEFAULT_FIX.to_string()),
        })
    }
}

/// Scan lines labelled "possible cause"/"possible fix". Applies only to
/// replies without any JSON braces; both labels must be present.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordScanStrategy;

impl KeywordScanStrategy {
    fn labelled_value(line: &str) -> String {
        line.split_once(':')
            .map_or_else(|| line.to_string(), |(_, value)| value.trim().to_string())
    }
}

impl ExtractionStrategy<FailureInsight> for KeywordScanStrategy {
    fn name(&self) -> &'static str {
        "keyword_scan"
    }

    fn extract(&self, reply: &str) -> Option<FailureInsight> {
        if reply.contains('{') && reply.contains('}') {
            return None;
        }

        let mut cause = String::new();
        let mut fix = String::new();
        for line in reply.lines() {
            let lower = line.to_lowercase();
            if lower.contains("possible cause") || lower.contains("possible_cause") {
                cause = Self::labelled_value(line);
            } else if lower.contains("possible fix") || lower.contains("possible_fix") {
                fix = Self::labelled_value(line);
            }
        }

        (!cause.is_empty() && !fix.is_empty()).then(|| FailureInsight {
            possible_cause: truncate_chars(&cause, KEYWORD_FIELD_LIMIT),
            possible_fix: truncate_chars(&fix, KEYWORD_FIELD_LIMIT),
        })
    }
}

/// JSON first, then keyword scan.
pub fn insight_strategies() -> [&'static dyn ExtractionStrategy<FailureInsight>; 2] {
    [&JsonInsightStrategy, &KeywordScanStrategy]
}
