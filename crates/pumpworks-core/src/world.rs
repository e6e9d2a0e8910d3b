//! Traits for the collaborators a pump talks to: the fluid grid it scans
//! and the power signal that enables it.
//!
//! The host owns both. The controller only borrows them for the duration
//! of one cycle and assumes nothing else touches the cell it is working on
//! during that cycle.

use crate::buffer::FluidStack;
use crate::position::Position;
use crate::sim::Action;

/// A grid of cells that may hold drainable fluid.
pub trait FluidGrid {
    /// Handle to a single drainable cell, borrowed from the grid.
    type Cell<'a>: DrainHandle
    where
        Self: 'a;

    /// Returns a handle if the cell at `pos` holds something drainable.
    fn lookup(&mut self, pos: Position) -> Option<Self::Cell<'_>>;
}

/// A drainable cell.
pub trait DrainHandle {
    /// Drain up to `max_amount`. Returns what was (or would be) drained, or
    /// `None` if the cell cannot give anything within that limit.
    fn drain(&mut self, max_amount: u32, action: Action) -> Option<FluidStack>;

    /// Turn the cell into an inert solid.
    fn replace_with_solid(&mut self);
}

/// Whether a position receives an enabling power signal.
pub trait PowerSignal {
    fn is_powered(&self, pos: Position) -> bool;
}

impl<F> PowerSignal for F
where
    F: Fn(Position) -> bool,
{
    fn is_powered(&self, pos: Position) -> bool {
        self(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_power_signals() {
        let host = Position::new(0, 64, 0);
        let only_host = move |pos: Position| pos == host;
        assert!(only_host.is_powered(host));
        assert!(!only_host.is_powered(host.down()));

        let never = |_: Position| false;
        assert!(!never.is_powered(host));
    }
}
