//! Tick and action primitives shared by every component.
//!
//! The pump is driven by an external periodic tick. Each call to
//! [`PumpController::tick`](crate::pump::PumpController::tick) is one cycle;
//! the controller keeps its own tick counter and uses [`Throttle`] to decide
//! which cycles are allowed to do work.

use serde::{Deserialize, Serialize};

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Whether a store operation should mutate state or only report what it
/// would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Compute the would-be result without mutating anything.
    Simulate,
    /// Apply the operation.
    Execute,
}

impl Action {
    /// Returns `true` for [`Action::Execute`].
    #[inline]
    pub fn execute(self) -> bool {
        matches!(self, Action::Execute)
    }
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

/// Gates work to every `speed`-th tick. A speed of 0 means every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throttle {
    pub speed: u32,
}

impl Throttle {
    pub fn new(speed: u32) -> Self {
        Self { speed }
    }

    /// Returns `true` if work may happen on `tick`.
    #[inline]
    pub fn is_due(&self, tick: Ticks) -> bool {
        self.speed == 0 || tick % u64::from(self.speed) == 0
    }
}
