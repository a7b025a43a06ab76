//! Read-only view of the chain state for display

use serde::{Deserialize, Serialize};

use super::Mode;
use crate::chain::{ChainState, Status};

/// Snapshot of everything a display needs, published after every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainView {
    pub mode: Mode,
    pub remaining_seconds: u32,
    /// Remaining time formatted as `m:ss`
    pub display: String,
    pub is_running: bool,
    pub status: Status,
    pub current_hits: Option<u32>,
    pub primary_threshold: u32,
    pub volume: u8,
    /// Last fetch error, cleared by the next successful poll
    pub last_error: Option<String>,
}

impl ChainView {
    pub fn new(state: &ChainState, last_error: Option<String>) -> Self {
        Self {
            mode: state.mode(),
            remaining_seconds: state.timer.remaining_seconds,
            display: format_remaining(state.timer.remaining_seconds),
            is_running: state.timer.is_running,
            status: state.status(),
            current_hits: state.current_hits,
            primary_threshold: state.thresholds.primary(),
            volume: state.volume,
            last_error,
        }
    }
}

/// Format seconds as `m:ss`
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
