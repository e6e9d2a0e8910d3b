//! Single-kind fluid buffer (the pump's tank).
//!
//! The buffer holds at most one [`FluidStack`]. The owning controller fills
//! it through [`ResourceBuffer::fill_internal`], which ignores the fill
//! policy; external consumers go through [`ResourceBuffer::fill`] and
//! [`ResourceBuffer::drain`], which respect `can_fill` / `can_drain`.
//!
//! Any change to the contents sets an internal flag that the owner collects
//! with [`ResourceBuffer::take_changed`] to know the buffer needs saving.

use serde::{Deserialize, Serialize};

use crate::id::FluidKind;
use crate::sim::Action;

/// Volume of one extractable unit (one source cell).
pub const UNIT_VOLUME: u32 = 1_000;

// ---------------------------------------------------------------------------
// FluidStack
// ---------------------------------------------------------------------------

/// An amount of a single fluid kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidStack {
    pub kind: FluidKind,
    pub amount: u32,
}

impl FluidStack {
    pub fn new(kind: FluidKind, amount: u32) -> Self {
        Self { kind, amount }
    }

    /// Returns `true` if both stacks carry the same kind (amount ignored).
    pub fn is_same_kind(&self, other: &FluidStack) -> bool {
        self.kind == other.kind
    }

    /// A copy of this stack with a different amount.
    pub fn with_amount(self, amount: u32) -> Self {
        Self { amount, ..self }
    }
}

// ---------------------------------------------------------------------------
// ResourceBuffer
// ---------------------------------------------------------------------------

/// A bounded fluid store. `amount` always stays within `[0, capacity]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBuffer {
    contents: Option<FluidStack>,
    capacity: u32,
    can_fill: bool,
    can_drain: bool,
    #[serde(skip)]
    changed: bool,
}

impl ResourceBuffer {
    /// An empty buffer that accepts external fills and drains.
    pub fn new(capacity: u32) -> Self {
        Self {
            contents: None,
            capacity,
            can_fill: true,
            can_drain: true,
            changed: false,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn amount(&self) -> u32 {
        self.contents.map_or(0, |s| s.amount)
    }

    pub fn fluid(&self) -> Option<&FluidStack> {
        self.contents.as_ref()
    }

    pub fn kind(&self) -> Option<FluidKind> {
        self.contents.map(|s| s.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    /// Room left before the buffer is at capacity.
    pub fn space(&self) -> u32 {
        self.capacity - self.amount()
    }

    pub fn can_fill(&self) -> bool {
        self.can_fill
    }

    pub fn can_drain(&self) -> bool {
        self.can_drain
    }

    pub fn set_can_fill(&mut self, can_fill: bool) {
        self.can_fill = can_fill;
    }

    pub fn set_can_drain(&mut self, can_drain: bool) {
        self.can_drain = can_drain;
    }

    /// Fill from an external source. Returns 0 when filling is disabled.
    pub fn fill(&mut self, resource: &FluidStack, action: Action) -> u32 {
        if !self.can_fill {
            return 0;
        }
        self.fill_internal(resource, action)
    }

    /// Fill bypassing the fill policy. Returns how much was (or would be)
    /// accepted: 0 for an empty offer or a kind mismatch, otherwise the
    /// offered amount clamped to the remaining space.
    pub fn fill_internal(&mut self, resource: &FluidStack, action: Action) -> u32 {
        if resource.amount == 0 {
            return 0;
        }
        let accepted = match &self.contents {
            None => resource.amount.min(self.capacity),
            Some(current) if !current.is_same_kind(resource) => return 0,
            Some(current) => resource.amount.min(self.capacity - current.amount),
        };
        if action.execute() && accepted > 0 {
            let amount = self.amount() + accepted;
            self.contents = Some(resource.with_amount(amount));
            self.changed = true;
        }
        accepted
    }

    /// Drain up to `max_amount` of whatever the buffer holds.
    pub fn drain(&mut self, max_amount: u32, action: Action) -> Option<FluidStack> {
        if !self.can_drain || max_amount == 0 {
            return None;
        }
        let current = self.contents?;
        let drained = current.with_amount(current.amount.min(max_amount));
        if action.execute() {
            let left = current.amount - drained.amount;
            self.contents = (left > 0).then(|| current.with_amount(left));
            self.changed = true;
        }
        Some(drained)
    }

    /// Drain only if the buffer holds the same kind as `resource`.
    pub fn drain_matching(&mut self, resource: &FluidStack, action: Action) -> Option<FluidStack> {
        match &self.contents {
            Some(current) if current.is_same_kind(resource) => {
                self.drain(resource.amount, action)
            }
            _ => None,
        }
    }

    /// Replace the contents outright, clamping to capacity. Used when
    /// restoring persisted state.
    pub fn set_contents(&mut self, contents: Option<FluidStack>) {
        let capacity = self.capacity;
        self.contents = contents
            .map(|s| s.with_amount(s.amount.min(capacity)))
            .filter(|s| s.amount > 0);
        self.changed = true;
    }

    /// Returns `true` if the contents changed since the last
    /// [`take_changed`](Self::take_changed).
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Read and reset the change flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
