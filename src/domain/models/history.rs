use serde::{Deserialize, Serialize};

/// Flakiness summary of a test's past runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_runs: u64,
    /// Percentage in `[0, 100]`, rounded to two decimals.
    pub pass_rate: f64,
    pub consistently_failing: bool,
}

impl Default for HistorySummary {
    fn default() -> Self {
        Self {
            total_runs: 0,
            pass_rate: 0.0,
            consistently_failing: false,
        }
    }
}
