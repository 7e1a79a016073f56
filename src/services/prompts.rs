//! Prompt construction for failure analysis.
//!
//! A class prompt merges every failure message and every trace of the
//! class into one request, so the model sees a single combined signal per
//! class. Each merged section is capped to a character budget and cut at a
//! line boundary.

use tracing::warn;

use crate::domain::models::FailureDetail;

/// Cap `text` to `max_chars` characters, cutting at the last newline
/// before the limit and appending a truncation marker.
pub fn truncate_section(text: &str, max_chars: usize) -> String {
    let Some((limit, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let cut = text[..limit].rfind('\n').unwrap_or(limit);

    format!(
        "{}\n[... truncated: kept {} of {} chars ...]",
        &text[..cut],
        text[..cut].chars().count(),
        text.chars().count()
    )
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Merged failure signal of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedFailures {
    pub message: String,
    pub trace: String,
}

impl CombinedFailures {
    /// Newline-join all messages and all traces, in detail order.
    pub fn from_details(details: &[FailureDetail]) -> Self {
        let message = details
            .iter()
            .map(|d| d.message.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let trace = details
            .iter()
            .map(|d| d.trace.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self { message, trace }
    }

    /// Apply the per-section budget.
    #[must_use]
    pub fn within_budget(self, max_section_chars: usize, class_name: &str) -> Self {
        for (section, content) in [("message", &self.message), ("trace", &self.trace)] {
            let chars = content.chars().count();
            if chars > max_section_chars {
                warn!(
                    class = class_name,
                    section,
                    chars,
                    limit = max_section_chars,
                    "prompt section truncated"
                );
            }
        }
        Self {
            message: truncate_section(&self.message, max_section_chars),
            trace: truncate_section(&self.trace, max_section_chars),
        }
    }
}

/// Prompt asking for causes and solutions of a class's failures.
pub fn class_analysis_prompt(failures: &CombinedFailures) -> String {
    format!(
        r#"Analyze these test failure details and provide a detailed analysis:
1. Possible causes (be specific about the technical reasons)
2. Possible solutions (provide concrete steps to resolve)

Failure Details:
Error Message: {message}
Stack Trace: {trace}

Format the response as JSON with the following structure:
{{
    "causes": [
        {{
            "cause": "detailed cause description",
            "confidence": "high/medium/low",
            "technical_details": "specific technical explanation"
        }}
    ],
    "solutions": [
        {{
            "solution": "detailed solution steps",
            "priority": "high/medium/low",
            "implementation_steps": ["step1", "step2", ...]
        }}
    ]
}}
"#,
        message = failures.message,
        trace = failures.trace,
    )
}

/// Prompt asking for a short cause/fix pair for one failure.
pub fn single_failure_prompt(description: &str, message: &str, trace: &str) -> String {
    format!(
        r#"Analyze this test failure and provide a concise explanation of the possible cause and fix.

Test description: {description}
Error message: {message}
Stack trace: {trace}

Please respond with a JSON object containing two fields:
1. "possible_cause": A brief explanation of what might have caused this error
2. "possible_fix": A suggestion for how to fix this issue

Keep each field under 200 characters and focus on the most likely explanation based on the error details.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(message: &str, trace: &str) -> FailureDetail {
        FailureDetail {
            message: message.to_string(),
            trace: trace.to_string(),
            location: None,
            test_method: String::new(),
            full_test_name: String::new(),
            test_file: String::new(),
            stage: None,
            history: None,
        }
    }

    #[test]
    fn test_combines_in_order() {
        let combined = CombinedFailures::from_details(&[
            detail("first", "trace-1"),
            detail("second", "trace-2"),
        ]);
        assert_eq!(combined.message, "first\nsecond");
        assert_eq!(combined.trace, "trace-1\ntrace-2");

        let prompt = class_analysis_prompt(&combined);
        assert!(prompt.contains("Error Message: first\nsecond"));
        assert!(prompt.contains("Stack Trace: trace-1\ntrace-2"));
        assert!(prompt.contains("\"implementation_steps\""));
    }

    #[test]
    fn test_truncate_section_cuts_at_newline() {
        let text = "line-one\nline-two\nline-three";
        let truncated = truncate_section(text, 12);
        assert!(truncated.starts_with("line-one\n[... truncated"));
        assert_eq!(truncate_section(text, 100), text);
    }

    #[test]
    fn test_truncate_section_counts_chars_not_bytes() {
        // 5 chars, 10 bytes: fits a 5 char budget
        let text = "ééééé";
        assert_eq!(truncate_section(text, 5), text);

        let truncated = truncate_section(text, 3);
        assert!(truncated.starts_with("ééé\n[... truncated: kept 3 of 5 chars"));
    }

    #[test]
    fn test_within_budget() {
        let combined = CombinedFailures {
            message: "a\n".repeat(50),
            trace: "short".to_string(),
        }
        .within_budget(20, "a.B");
        assert!(combined.message.contains("[... truncated"));
        assert_eq!(combined.trace, "short");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 200), "hi");
    }

    #[test]
    fn test_single_failure_prompt() {
        let prompt = single_failure_prompt("Login works", "boom", "at a.B(B.java:1)");
        assert!(prompt.contains("Test description: Login works"));
        assert!(prompt.contains("\"possible_fix\""));
    }
}
