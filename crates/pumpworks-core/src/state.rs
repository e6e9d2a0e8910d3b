//! Derived pump state.
//!
//! [`PumpState`] is never stored. The controller builds a [`PumpSnapshot`]
//! every cycle and runs [`evaluate`] on it; the first matching rule wins:
//!
//! 1. no stored energy -> [`PumpState::NoEnergy`]
//! 2. cursor not initialized -> [`PumpState::Unknown`]
//! 3. cursor on the sentinel slice -> [`PumpState::Done`]
//! 4. host not powered -> [`PumpState::Unpowered`]
//! 5. buffer cannot take one more unit -> [`PumpState::Full`]
//! 6. otherwise -> [`PumpState::Working`]

use serde::{Deserialize, Serialize};

use crate::buffer::UNIT_VOLUME;

/// Operational status of a pump for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PumpState {
    NoEnergy,
    Unpowered,
    Full,
    Working,
    Done,
    Unknown,
}

impl PumpState {
    /// Only a working pump moves its cursor or drains cells.
    pub fn is_working(self) -> bool {
        self == PumpState::Working
    }

    /// Short human-readable status line.
    pub fn describe(self) -> &'static str {
        match self {
            PumpState::NoEnergy => "no energy",
            PumpState::Unpowered => "waiting for power signal",
            PumpState::Full => "tank full",
            PumpState::Working => "working",
            PumpState::Done => "done",
            PumpState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PumpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// How far the sweep has got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweepProgress {
    Uninitialized,
    Scanning,
    Done,
}

/// Everything [`evaluate`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpSnapshot {
    pub energy_stored: u32,
    pub sweep: SweepProgress,
    pub powered: bool,
    pub buffer_amount: u32,
    pub buffer_capacity: u32,
}

/// Derive the pump state from a snapshot.
pub fn evaluate(snapshot: &PumpSnapshot) -> PumpState {
    if snapshot.energy_stored == 0 {
        return PumpState::NoEnergy;
    }
    match snapshot.sweep {
        SweepProgress::Uninitialized => PumpState::Unknown,
        SweepProgress::Done => PumpState::Done,
        SweepProgress::Scanning if !snapshot.powered => PumpState::Unpowered,
        SweepProgress::Scanning if is_full(snapshot.buffer_amount, snapshot.buffer_capacity) => {
            PumpState::Full
        }
        SweepProgress::Scanning => PumpState::Working,
    }
}

/// The buffer cannot take another full unit. Compared in signed space so a
/// capacity below one unit always reads as full.
fn is_full(amount: u32, capacity: u32) -> bool {
    i64::from(amount) > i64::from(capacity) - i64::from(UNIT_VOLUME)
}
