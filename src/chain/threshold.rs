//! Threshold set and edge-triggered crossing detection.
//!
//! A crossing is a transition of the remaining time from strictly above a
//! threshold to at-or-below it. The very first observation counts as a
//! crossing for every threshold it already sits at or below, so a session
//! that starts deep into a chain still raises the alarm.

use std::collections::BTreeSet;

/// Thresholds that are always checked alongside the configurable one.
pub const SECONDARY_THRESHOLDS: [u32; 3] = [15, 10, 5];

/// Values the primary threshold may take.
pub const PRIMARY_CHOICES: [u32; 7] = [120, 90, 60, 45, 30, 20, 15];

pub const DEFAULT_PRIMARY_THRESHOLD: u32 = 60;

/// The primary threshold plus the fixed secondary ones.
///
/// Duplicates collapse (a primary of 15 simply coincides with the first
/// secondary), and evaluation order is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdSet {
    primary: u32,
    all: BTreeSet<u32>,
}

impl ThresholdSet {
    pub fn new(primary: u32) -> Self {
        let mut all: BTreeSet<u32> = SECONDARY_THRESHOLDS.into_iter().collect();
        all.insert(primary);
        Self { primary, all }
    }

    pub fn primary(&self) -> u32 {
        self.primary
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.all.iter().copied()
    }

    /// Whether `value` is one of the selectable primary thresholds
    pub fn is_allowed_primary(value: u32) -> bool {
        PRIMARY_CHOICES.contains(&value)
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_THRESHOLD)
    }
}

/// Decide whether moving from `previous` to `current` crosses any threshold.
///
/// Returns a single decision no matter how many thresholds were crossed in
/// the step. Stateless; the caller owns the edge bookkeeping.
pub fn check_crossing(previous: Option<u32>, current: u32, thresholds: &ThresholdSet) -> bool {
    thresholds.iter().any(|threshold| match previous {
        Some(previous) => previous > threshold && current <= threshold,
        None => current <= threshold,
    })
}
