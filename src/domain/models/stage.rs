use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution phase a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Test,
    Teardown,
    Unknown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Setup => "Setup",
            Self::Test => "Test",
            Self::Teardown => "Teardown",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Stage in which a failure occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    pub name: String,
    pub phase: Phase,
}

impl StageInfo {
    pub fn new(name: impl Into<String>, phase: Phase) -> Self {
        Self {
            name: name.into(),
            phase,
        }
    }

    pub fn unknown() -> Self {
        Self::new(super::outcome::UNKNOWN, Phase::Unknown)
    }
}
