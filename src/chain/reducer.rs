//! Single reducer for every change to the chain state.
//!
//! ```text
//! apply(state, event) -> (state', effects)
//! ```
//!
//! Local ticks, remote snapshots, manual commands and settings changes all
//! pass through [`ChainState::apply`]. Side effects come back as an explicit
//! list for the caller to execute after it has committed the new state.

use tracing::{debug, info};

use super::{clock, reconcile, status, RemoteSnapshot, Status, ThresholdSet};
use crate::state::{EdgeState, Mode, TimerState};

/// Default alarm volume in percent
pub const DEFAULT_VOLUME: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick,
    Snapshot(RemoteSnapshot),
    Start,
    Reset,
    Stop,
    SetThreshold(u32),
    SetVolume(u8),
    SetMode(Mode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FireAlarm { volume: u8 },
}

/// Everything the engine owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainState {
    pub timer: TimerState,
    pub edge: EdgeState,
    /// Most recent uncompensated remote timeout, only used to skip duplicates
    pub last_raw_timeout: Option<u32>,
    /// Hits reported by the last applied snapshot
    pub current_hits: Option<u32>,
    pub thresholds: ThresholdSet,
    pub volume: u8,
}

impl ChainState {
    pub fn new(mode: Mode, primary_threshold: u32, volume: u8) -> Self {
        Self {
            timer: TimerState::new(mode),
            edge: EdgeState::default(),
            last_raw_timeout: None,
            current_hits: None,
            thresholds: ThresholdSet::new(primary_threshold),
            volume,
        }
    }

    pub fn mode(&self) -> Mode {
        self.timer.mode
    }

    pub fn status(&self) -> Status {
        let hits = if self.timer.is_synced() {
            self.current_hits
        } else {
            None
        };
        status::classify(
            self.timer.is_running,
            self.timer.remaining_seconds,
            hits,
            self.thresholds.primary(),
        )
    }

    /// Produce the next state and the effects it calls for
    pub fn apply(&self, event: Event) -> (ChainState, Vec<Effect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            Event::Tick => {
                let step = clock::tick(&next.timer, &next.edge, &next.thresholds);
                next.timer = step.timer;
                next.edge = step.edge;
                if step.fire {
                    effects.push(Effect::FireAlarm { volume: next.volume });
                }
            }
            Event::Snapshot(snapshot) => {
                if next.last_raw_timeout == Some(snapshot.timeout_seconds) {
                    debug!(
                        "Discarding duplicate snapshot (raw timeout {}s)",
                        snapshot.timeout_seconds
                    );
                    return (next, effects);
                }
                next.last_raw_timeout = Some(snapshot.timeout_seconds);

                let step =
                    reconcile::apply_snapshot(&next.timer, &next.edge, &snapshot, &next.thresholds);
                next.timer = step.timer;
                next.edge = step.edge;
                next.current_hits = Some(snapshot.current_hits);
                if step.fire {
                    effects.push(Effect::FireAlarm { volume: next.volume });
                }
            }
            Event::Start | Event::Reset | Event::Stop if next.timer.is_synced() => {
                debug!("Ignoring manual {:?} while synced", event);
            }
            Event::Start => {
                if !next.timer.is_running {
                    if next.timer.remaining_seconds == 0 {
                        next.timer.reload();
                        next.edge.reset();
                    }
                    next.timer.is_running = true;
                }
            }
            Event::Reset => {
                next.timer.reload();
                next.edge.reset();
            }
            Event::Stop => {
                next.timer.is_running = false;
            }
            Event::SetThreshold(primary) => {
                next.thresholds = ThresholdSet::new(primary);
            }
            Event::SetVolume(volume) => {
                next.volume = volume.min(100);
            }
            Event::SetMode(mode) => {
                if mode != next.timer.mode {
                    info!("Switching chain mode to {:?}", mode);
                    next.timer = TimerState::new(mode);
                    next.edge.reset();
                    next.last_raw_timeout = None;
                    next.current_hits = None;
                }
            }
        }

        (next, effects)
    }
}

impl Default for ChainState {
    fn default() -> Self {
        Self::new(
            Mode::default(),
            super::DEFAULT_PRIMARY_THRESHOLD,
            DEFAULT_VOLUME,
        )
    }
}
