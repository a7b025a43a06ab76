//! Display status derivation

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remaining time at or below which the chain is critical regardless of the
/// configured primary threshold
pub const CRITICAL_SECS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    NoChain,
    Dropped,
    Stopped,
    Critical,
    Warning,
    Running,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NoChain => "no-chain",
            Status::Dropped => "dropped",
            Status::Stopped => "stopped",
            Status::Critical => "critical",
            Status::Warning => "warning",
            Status::Running => "running",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the countdown. First matching rule wins.
///
/// `current_hits_if_synced` is `None` in manual mode, or in synced mode
/// before the first snapshot has been applied.
pub fn classify(
    is_running: bool,
    remaining_seconds: u32,
    current_hits_if_synced: Option<u32>,
    primary_threshold: u32,
) -> Status {
    if current_hits_if_synced == Some(0) && !is_running {
        Status::NoChain
    } else if !is_running && remaining_seconds == 0 {
        Status::Dropped
    } else if !is_running {
        Status::Stopped
    } else if remaining_seconds <= CRITICAL_SECS {
        Status::Critical
    } else if remaining_seconds <= primary_threshold {
        Status::Warning
    } else {
        Status::Running
    }
}
