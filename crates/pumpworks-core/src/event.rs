//! Events returned from [`PumpController::tick`](crate::pump::PumpController::tick).
//!
//! State changes are reported on transitions only, not every tick.

use crate::buffer::FluidStack;
use crate::position::Position;
use crate::sim::Ticks;
use crate::state::PumpState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpEvent {
    /// The evaluated state differs from the previous cycle's. `from` is
    /// `None` on the first evaluation.
    StateChanged {
        from: Option<PumpState>,
        to: PumpState,
        tick: Ticks,
    },
    /// A cell was drained into the buffer.
    CellDrained {
        pos: Position,
        fluid: FluidStack,
        tick: Ticks,
    },
    /// The buffer would not take everything the cell offered, so nothing
    /// was moved. The cursor moves on next eligible cycle; the cell is not
    /// revisited this sweep.
    TransferRejected {
        pos: Position,
        offered: FluidStack,
        tick: Ticks,
    },
    /// The cursor entered the sentinel slice.
    SweepCompleted { tick: Ticks },
}

impl PumpEvent {
    pub fn tick(&self) -> Ticks {
        match self {
            PumpEvent::StateChanged { tick, .. }
            | PumpEvent::CellDrained { tick, .. }
            | PumpEvent::TransferRejected { tick, .. }
            | PumpEvent::SweepCompleted { tick } => *tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FluidKind;

    #[test]
    fn tick_accessor_covers_every_variant() {
        let fluid = FluidStack::new(FluidKind(0), 1000);
        let events = [
            PumpEvent::StateChanged {
                from: None,
                to: PumpState::Working,
                tick: 1,
            },
            PumpEvent::CellDrained {
                pos: Position::ORIGIN,
                fluid,
                tick: 2,
            },
            PumpEvent::TransferRejected {
                pos: Position::ORIGIN,
                offered: fluid,
                tick: 3,
            },
            PumpEvent::SweepCompleted { tick: 4 },
        ];
        let ticks: Vec<Ticks> = events.iter().map(PumpEvent::tick).collect();
        assert_eq!(ticks, vec![1, 2, 3, 4]);
    }
}
