//! Timer state structure and management

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Full chain duration in seconds, used as the manual reset target and the
/// synced no-chain reset target
pub const FULL_DURATION_SECS: u32 = 300;

/// Where the countdown gets its authority from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local one-second ticking only, driven by start/reset/stop commands
    #[default]
    Manual,
    /// Local ticking corrected by periodic remote snapshots
    Synced,
}

/// Countdown state for the tracked chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub mode: Mode,
}

impl TimerState {
    /// Create a stopped timer loaded with the full chain duration
    pub fn new(mode: Mode) -> Self {
        Self {
            remaining_seconds: FULL_DURATION_SECS,
            is_running: false,
            mode,
        }
    }

    /// Reload the full chain duration without touching the running flag
    pub fn reload(&mut self) {
        self.remaining_seconds = FULL_DURATION_SECS;
    }

    pub fn is_synced(&self) -> bool {
        self.mode == Mode::Synced
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

/// Last remaining value that threshold crossings are measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeState {
    pub last_observed: Option<u32>,
}

impl EdgeState {
    pub fn observe(&mut self, remaining_seconds: u32) {
        self.last_observed = Some(remaining_seconds);
    }

    /// Forget the last observation so the next one counts as a first sighting
    pub fn reset(&mut self) {
        self.last_observed = None;
    }
}
