//! Local one-second countdown step

use super::{threshold::check_crossing, Step, ThresholdSet};
use crate::state::{EdgeState, Mode, TimerState};

/// Advance the countdown by one second.
///
/// A stopped timer is left alone. In manual mode hitting zero stops the
/// timer; in synced mode it keeps running until the next snapshot says
/// otherwise.
pub fn tick(timer: &TimerState, edge: &EdgeState, thresholds: &ThresholdSet) -> Step {
    let mut timer = timer.clone();
    let mut edge = *edge;

    if !timer.is_running {
        return Step {
            timer,
            edge,
            fire: false,
        };
    }

    timer.remaining_seconds = timer.remaining_seconds.saturating_sub(1);
    if timer.remaining_seconds == 0 && timer.mode == Mode::Manual {
        timer.is_running = false;
    }

    let fire = check_crossing(edge.last_observed, timer.remaining_seconds, thresholds);
    edge.observe(timer.remaining_seconds);

    Step { timer, edge, fire }
}
