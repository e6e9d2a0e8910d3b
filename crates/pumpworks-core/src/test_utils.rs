//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`. Provides an
//! in-memory [`TestGrid`], a switchable [`TestPower`] signal, and a few
//! pump constructors.

use std::collections::{BTreeMap, BTreeSet};

use crate::buffer::{FluidStack, UNIT_VOLUME};
use crate::config::PumpConfig;
use crate::event::PumpEvent;
use crate::id::FluidKind;
use crate::position::{Position, Region};
use crate::pump::PumpController;
use crate::sim::Action;
use crate::world::{DrainHandle, FluidGrid, PowerSignal};

// ===========================================================================
// Fluid kinds
// ===========================================================================

pub fn water() -> FluidKind {
    FluidKind(0)
}

pub fn lava() -> FluidKind {
    FluidKind(1)
}

// ===========================================================================
// Grid
// ===========================================================================

/// What occupies a cell of a [`TestGrid`]. Absent cells are air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCell {
    /// A full source cell: gives exactly one unit, only when the caller can
    /// take a whole unit.
    Source(FluidKind),
    /// Flowing fluid: visible but never drainable.
    Flowing(FluidKind),
    /// An arbitrary amount that drains in one go, clamped to the request.
    Pool(FluidStack),
    /// Inert solid.
    Solid,
}

/// An in-memory fluid grid that records every committed drain.
#[derive(Debug, Clone, Default)]
pub struct TestGrid {
    cells: BTreeMap<Position, TestCell>,
    drained: Vec<Position>,
}

impl TestGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pos: Position, cell: TestCell) {
        self.cells.insert(pos, cell);
    }

    pub fn clear(&mut self, pos: Position) {
        self.cells.remove(&pos);
    }

    pub fn get(&self, pos: Position) -> Option<TestCell> {
        self.cells.get(&pos).copied()
    }

    /// Put a source cell of `kind` on every cell of `region`.
    pub fn fill_region(&mut self, region: &Region, kind: FluidKind) {
        for pos in region.cells() {
            self.set(pos, TestCell::Source(kind));
        }
    }

    /// Positions drained so far, in order.
    pub fn drained(&self) -> &[Position] {
        &self.drained
    }

    /// Number of source cells left.
    pub fn source_count(&self) -> usize {
        self.cells
            .values()
            .filter(|c| matches!(c, TestCell::Source(_)))
            .count()
    }
}

/// A handle to one drainable [`TestGrid`] cell.
#[derive(Debug)]
pub struct TestCellHandle<'a> {
    grid: &'a mut TestGrid,
    pos: Position,
}

impl DrainHandle for TestCellHandle<'_> {
    fn drain(&mut self, max_amount: u32, action: Action) -> Option<FluidStack> {
        let drained = match self.grid.get(self.pos)? {
            TestCell::Source(kind) if max_amount >= UNIT_VOLUME => {
                FluidStack::new(kind, UNIT_VOLUME)
            }
            TestCell::Pool(stack) => stack.with_amount(stack.amount.min(max_amount)),
            _ => return None,
        };
        if action.execute() {
            let left = match self.grid.get(self.pos) {
                Some(TestCell::Pool(stack)) if stack.amount > drained.amount => {
                    Some(TestCell::Pool(stack.with_amount(stack.amount - drained.amount)))
                }
                _ => None,
            };
            match left {
                Some(cell) => self.grid.set(self.pos, cell),
                None => self.grid.clear(self.pos),
            }
            self.grid.drained.push(self.pos);
        }
        Some(drained)
    }

    fn replace_with_solid(&mut self) {
        self.grid.set(self.pos, TestCell::Solid);
    }
}

impl FluidGrid for TestGrid {
    type Cell<'a> = TestCellHandle<'a>;

    fn lookup(&mut self, pos: Position) -> Option<TestCellHandle<'_>> {
        if matches!(self.cells.get(&pos)?, TestCell::Solid) {
            return None;
        }
        Some(TestCellHandle { grid: self, pos })
    }
}

// ===========================================================================
// Power
// ===========================================================================

/// A power signal switched per position.
#[derive(Debug, Clone, Default)]
pub struct TestPower {
    powered: BTreeSet<Position>,
}

impl TestPower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pos: Position, on: bool) {
        if on {
            self.powered.insert(pos);
        } else {
            self.powered.remove(&pos);
        }
    }
}

impl PowerSignal for TestPower {
    fn is_powered(&self, pos: Position) -> bool {
        self.powered.contains(&pos)
    }
}

pub fn always_powered() -> impl Fn(Position) -> bool {
    |_| true
}

pub fn never_powered() -> impl Fn(Position) -> bool {
    |_| false
}

// ===========================================================================
// Pumps
// ===========================================================================

/// A config that works every tick and never runs out of energy.
pub fn eager_config(range: u32) -> PumpConfig {
    PumpConfig {
        range,
        speed: 0,
        uses_energy: false,
        energy_usage_per_move: 0,
        energy_usage_per_drain: 0,
        ..PumpConfig::default()
    }
}

/// Build a pump, panicking on an invalid config.
pub fn make_pump(host: Position, config: PumpConfig) -> PumpController {
    PumpController::new(host, config).expect("test config is valid")
}

/// Run `ticks` cycles and collect every event.
pub fn run<P: PowerSignal + ?Sized>(
    pump: &mut PumpController,
    grid: &mut TestGrid,
    power: &P,
    ticks: u64,
) -> Vec<PumpEvent> {
    (0..ticks).flat_map(|_| pump.tick(grid, power)).collect()
}

/// Run until the pump reports a completed sweep or `limit` cycles pass.
/// Returns the number of cycles run.
pub fn run_to_completion<P: PowerSignal + ?Sized>(
    pump: &mut PumpController,
    grid: &mut TestGrid,
    power: &P,
    limit: u64,
) -> u64 {
    for n in 1..=limit {
        let events = pump.tick(grid, power);
        if events
            .iter()
            .any(|e| matches!(e, PumpEvent::SweepCompleted { .. }))
        {
            return n;
        }
    }
    limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_needs_a_whole_unit() {
        let mut grid = TestGrid::new();
        let pos = Position::new(0, 5, 0);
        grid.set(pos, TestCell::Source(water()));

        let mut cell = grid.lookup(pos).unwrap();
        assert!(cell.drain(999, Action::Simulate).is_none());
        assert_eq!(
            cell.drain(5000, Action::Execute),
            Some(FluidStack::new(water(), UNIT_VOLUME))
        );
        assert_eq!(grid.get(pos), None);
        assert_eq!(grid.drained(), &[pos]);
    }

    #[test]
    fn pool_drains_partially() {
        let mut grid = TestGrid::new();
        let pos = Position::new(0, 5, 0);
        grid.set(pos, TestCell::Pool(FluidStack::new(lava(), 1500)));

        let mut cell = grid.lookup(pos).unwrap();
        assert_eq!(cell.drain(1000, Action::Execute).map(|s| s.amount), Some(1000));
        assert_eq!(
            grid.get(pos),
            Some(TestCell::Pool(FluidStack::new(lava(), 500)))
        );
    }

    #[test]
    fn solids_and_air_have_no_handle() {
        let mut grid = TestGrid::new();
        let pos = Position::new(0, 5, 0);
        assert!(grid.lookup(pos).is_none());
        grid.set(pos, TestCell::Solid);
        assert!(grid.lookup(pos).is_none());
    }

    #[test]
    fn power_switches_per_position() {
        let mut power = TestPower::new();
        let pos = Position::new(3, 3, 3);
        assert!(!power.is_powered(pos));
        power.set(pos, true);
        assert!(power.is_powered(pos));
        power.set(pos, false);
        assert!(!power.is_powered(pos));
    }
}
