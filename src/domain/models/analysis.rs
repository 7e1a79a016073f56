//! Root-cause analysis produced by the generative model.

use serde::{Deserialize, Serialize};

/// How sure the model is about a cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// How urgently a solution should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub cause: String,
    pub confidence: Confidence,
    pub technical_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub solution: String,
    pub priority: Priority,
    #[serde(default)]
    pub implementation_steps: Vec<String>,
}

/// Causes and solutions for the failures of one test class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub causes: Vec<Cause>,
    pub solutions: Vec<Solution>,
}

impl Analysis {
    /// Analysis of a class that had nothing to analyze.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fixed-shape result used whenever the model call or reply parsing
    /// fails: one low-confidence cause and one low-priority solution.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            causes: vec![Cause {
                cause: "Error analyzing failures".to_string(),
                confidence: Confidence::Low,
                technical_details: reason.into(),
            }],
            solutions: vec![Solution {
                solution: "Unable to generate solutions".to_string(),
                priority: Priority::Low,
                implementation_steps: vec!["Check the error logs".to_string()],
            }],
        }
    }

    /// A usable analysis has at least one cause and one solution.
    pub fn is_well_formed(&self) -> bool {
        !self.causes.is_empty() && !self.solutions.is_empty()
    }
}

/// Cause/fix pair for a single failure analyzed in isolation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInsight {
    pub possible_cause: String,
    pub possible_fix: String,
}

impl FailureInsight {
    pub const DEFAULT_CAUSE: &'static str =
        "Could not determine cause. Please analyze the error message and stack trace manually.";
    pub const DEFAULT_FIX: &'static str =
        "Could not determine fix. Please review the code at the error location.";

    /// The "cannot determine" pair.
    pub fn undetermined() -> Self {
        Self {
            possible_cause: Self::DEFAULT_CAUSE.to_string(),
            possible_fix: Self::DEFAULT_FIX.to_string(),
        }
    }
}
