//! Saturating energy store.
//!
//! Every operation is total: requests larger than the headroom (or the
//! stored amount) are clamped, never rejected. The stored value therefore
//! always stays within `[0, capacity]`.

use serde::{Deserialize, Serialize};

use crate::sim::Action;

/// A bounded energy store with per-call transfer limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyBudget {
    stored: u32,
    capacity: u32,
    max_receive: u32,
    max_extract: u32,
}

impl EnergyBudget {
    /// A store whose per-call limits equal its capacity.
    pub fn new(capacity: u32) -> Self {
        Self::with_limits(capacity, capacity, capacity)
    }

    pub fn with_limits(capacity: u32, max_receive: u32, max_extract: u32) -> Self {
        Self {
            stored: 0,
            capacity,
            max_receive,
            max_extract,
        }
    }

    pub fn stored(&self) -> u32 {
        self.stored
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.stored == 0
    }

    pub fn can_receive(&self) -> bool {
        self.max_receive > 0
    }

    pub fn can_extract(&self) -> bool {
        self.max_extract > 0
    }

    /// Add up to `amount`. Returns how much was (or would be) accepted.
    pub fn receive(&mut self, amount: u32, action: Action) -> u32 {
        if !self.can_receive() {
            return 0;
        }
        let accepted = (self.capacity - self.stored)
            .min(self.max_receive)
            .min(amount);
        if action.execute() {
            self.stored += accepted;
        }
        accepted
    }

    /// Remove up to `amount`. Returns how much was (or would be) removed.
    pub fn extract(&mut self, amount: u32, action: Action) -> u32 {
        if !self.can_extract() {
            return 0;
        }
        let removed = self.stored.min(self.max_extract).min(amount);
        if action.execute() {
            self.stored -= removed;
        }
        removed
    }

    /// Top the store up to capacity, ignoring the per-call receive limit.
    pub fn fill(&mut self) {
        self.stored = self.capacity;
    }
}
