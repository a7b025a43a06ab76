//! Merging remote snapshots into the local countdown.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{threshold::check_crossing, Step, ThresholdSet};
use crate::state::{EdgeState, TimerState};

/// Seconds subtracted from a reported timeout to account for reporting delay
pub const LATENCY_OFFSET_SECS: u32 = 2;

/// One successful reading from the remote status provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    pub current_hits: u32,
    pub timeout_seconds: u32,
    pub cooldown_seconds: u32,
}

/// Where the chain is in its life, as told by a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Cooldown,
    NoChain,
    /// Timed out without cooldown while hits are still reported
    Unrecognized,
}

impl RemoteSnapshot {
    pub fn new(current_hits: u32, timeout_seconds: u32, cooldown_seconds: u32) -> Self {
        Self {
            current_hits,
            timeout_seconds,
            cooldown_seconds,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.timeout_seconds > 0 {
            Lifecycle::Active
        } else if self.cooldown_seconds > 0 {
            Lifecycle::Cooldown
        } else if self.current_hits == 0 {
            Lifecycle::NoChain
        } else {
            Lifecycle::Unrecognized
        }
    }
}

/// Apply the latency offset to a raw timeout, floored at zero
pub fn compensate(raw_timeout: u32) -> u32 {
    raw_timeout.saturating_sub(LATENCY_OFFSET_SECS)
}

/// Fold a snapshot into the timer and edge state.
///
/// Remote values replace whatever local ticking produced since the previous
/// snapshot; nothing is merged arithmetically.
pub fn apply_snapshot(
    timer: &TimerState,
    edge: &EdgeState,
    snapshot: &RemoteSnapshot,
    thresholds: &ThresholdSet,
) -> Step {
    let mut timer = timer.clone();
    let mut edge = *edge;
    let mut fire = false;

    match snapshot.lifecycle() {
        Lifecycle::Active => {
            let compensated = compensate(snapshot.timeout_seconds);
            timer.remaining_seconds = compensated;
            timer.is_running = true;
            fire = check_crossing(edge.last_observed, compensated, thresholds);
            edge.observe(compensated);
        }
        Lifecycle::Cooldown => {
            timer.remaining_seconds = 0;
            timer.is_running = false;
            edge.reset();
        }
        Lifecycle::NoChain => {
            timer.reload();
            timer.is_running = false;
            edge.reset();
        }
        Lifecycle::Unrecognized => {
            debug!(
                "Snapshot with {} hits, no timeout and no cooldown, leaving timer as is",
                snapshot.current_hits
            );
        }
    }

    Step { timer, edge, fire }
}
