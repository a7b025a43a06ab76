//! Chain countdown engine
//!
//! Pure state transitions for the chain timer: local ticking, remote
//! reconciliation, threshold crossing detection and status classification.
//! Nothing in here does I/O; the session task owns the state and executes
//! the effects the reducer asks for.

pub mod clock;
pub mod reconcile;
pub mod reducer;
pub mod status;
pub mod threshold;

use crate::state::{EdgeState, TimerState};

// Re-export main types
pub use reconcile::{compensate, RemoteSnapshot, LATENCY_OFFSET_SECS};
pub use reducer::{ChainState, Effect, Event, DEFAULT_VOLUME};
pub use status::{classify, Status};
pub use threshold::{check_crossing, ThresholdSet, DEFAULT_PRIMARY_THRESHOLD};

/// Outcome of a single clock tick or snapshot application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub timer: TimerState,
    pub edge: EdgeState,
    /// Whether an alarm should be requested for this step
    pub fire: bool,
}
