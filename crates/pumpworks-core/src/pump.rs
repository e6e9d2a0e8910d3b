//! The pump controller: one scan-and-extract cycle per tick.
//!
//! # Cycle
//!
//! Each call to [`PumpController::tick`] runs these steps to completion:
//!
//! 1. **Top-up** -- when energy accounting is off, fill the energy store.
//! 2. **Anchor** -- on first use, anchor the sweep below the host and seat
//!    the cursor on its first cell.
//! 3. **Evaluate** -- derive the [`PumpState`] from a fresh snapshot and
//!    report transitions.
//! 4. **Move** -- if the throttle is due and the state is `Working`, advance
//!    the cursor and debit the per-move cost.
//! 5. **Transfer** -- unless the cursor reached the sentinel, drain the
//!    cell under it into the tank, all or nothing.
//! 6. **Bookkeeping** -- collect dirty flags and increment the tick counter.

use log::{debug, trace};

use crate::buffer::ResourceBuffer;
use crate::capability::{Capability, CapabilityKind};
use crate::config::{ConfigError, PumpConfig};
use crate::cursor::ScanCursor;
use crate::dirty::DirtyTracker;
use crate::energy::EnergyBudget;
use crate::event::PumpEvent;
use crate::position::{Position, Region};
use crate::sim::{Action, Throttle, Ticks};
use crate::state::{self, PumpSnapshot, PumpState, SweepProgress};
use crate::world::{DrainHandle, FluidGrid, PowerSignal};

/// Capabilities every pump exposes.
const CAPABILITIES: &[CapabilityKind] = &CapabilityKind::ALL;

/// A single pump and everything it owns.
#[derive(Debug, Clone)]
pub struct PumpController {
    pub(crate) host: Position,
    pub(crate) config: PumpConfig,
    pub(crate) energy: EnergyBudget,
    pub(crate) buffer: ResourceBuffer,
    pub(crate) cursor: ScanCursor,
    pub(crate) throttle: Throttle,
    pub(crate) ticks: Ticks,
    pub(crate) dirty: DirtyTracker,
    /// State seen on the previous cycle, for transition events only.
    last_state: Option<PumpState>,
}

impl PumpController {
    /// Build a pump at `host`. The tank only ever empties outward: external
    /// fills are refused.
    pub fn new(host: Position, config: PumpConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut buffer = ResourceBuffer::new(config.tank_capacity);
        buffer.set_can_fill(false);
        Ok(Self {
            host,
            config,
            energy: EnergyBudget::new(config.energy_capacity),
            buffer,
            cursor: ScanCursor::new(config.range),
            throttle: Throttle::new(config.speed),
            ticks: 0,
            dirty: DirtyTracker::new(),
            last_state: None,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn host(&self) -> Position {
        self.host
    }

    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    pub fn energy(&self) -> &EnergyBudget {
        &self.energy
    }

    pub fn buffer(&self) -> &ResourceBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    /// Number of cycles run so far.
    pub fn ticks(&self) -> Ticks {
        self.ticks
    }

    pub fn current_position(&self) -> Option<Position> {
        self.cursor.current()
    }

    pub fn start_position(&self) -> Option<Position> {
        self.cursor.start()
    }

    /// The swept region, once anchored.
    pub fn region(&self) -> Option<Region> {
        self.cursor.region()
    }

    /// Capture everything the state evaluation depends on.
    pub fn snapshot<P: PowerSignal + ?Sized>(&self, power: &P) -> PumpSnapshot {
        let sweep = if !self.cursor.is_initialized() {
            SweepProgress::Uninitialized
        } else if self.cursor.is_done() {
            SweepProgress::Done
        } else {
            SweepProgress::Scanning
        };
        PumpSnapshot {
            energy_stored: self.energy.stored(),
            sweep,
            powered: power.is_powered(self.host),
            buffer_amount: self.buffer.amount(),
            buffer_capacity: self.buffer.capacity(),
        }
    }

    /// The current state, evaluated fresh.
    pub fn state<P: PowerSignal + ?Sized>(&self, power: &P) -> PumpState {
        state::evaluate(&self.snapshot(power))
    }

    // -----------------------------------------------------------------------
    // Dirty tracking
    // -----------------------------------------------------------------------

    /// What changed since the last [`mark_clean`](Self::mark_clean),
    /// including drains made through the fluid capability.
    pub fn dirty(&self) -> DirtyTracker {
        let mut dirty = self.dirty;
        if self.buffer.is_changed() {
            dirty.mark_buffer();
        }
        dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty().is_dirty()
    }

    pub fn mark_clean(&mut self) {
        self.dirty.mark_clean();
        self.buffer.take_changed();
    }

    // -----------------------------------------------------------------------
    // Capabilities
    // -----------------------------------------------------------------------

    pub fn has_capability(&self, kind: CapabilityKind) -> bool {
        CAPABILITIES.contains(&kind)
    }

    /// Hand out a mutable handle to the energy store or the tank.
    pub fn query_capability(&mut self, kind: CapabilityKind) -> Option<Capability<'_>> {
        if !self.has_capability(kind) {
            return None;
        }
        Some(match kind {
            CapabilityKind::Energy => Capability::Energy(&mut self.energy),
            CapabilityKind::Fluid => Capability::Fluid(&mut self.buffer),
        })
    }

    // -----------------------------------------------------------------------
    // Cycle
    // -----------------------------------------------------------------------

    /// Run one cycle against `grid` and `power`. Returns the events it
    /// produced.
    pub fn tick<G, P>(&mut self, grid: &mut G, power: &P) -> Vec<PumpEvent>
    where
        G: FluidGrid,
        P: PowerSignal + ?Sized,
    {
        let tick = self.ticks;
        let mut events = Vec::new();

        if !self.config.uses_energy {
            self.energy.fill();
        }

        if self.cursor.initialize(self.host) {
            self.dirty.mark_cursor();
            debug!(
                "pump at {}: sweep anchored at {:?}, range {}",
                self.host,
                self.cursor.start(),
                self.config.range
            );
        }

        let state = self.state(power);
        self.observe(state, tick, &mut events);

        if state.is_working() && self.throttle.is_due(tick) {
            self.step(grid, tick, &mut events);
        }

        if self.buffer.take_changed() {
            self.dirty.mark_buffer();
        }
        self.ticks += 1;
        events
    }

    fn observe(&mut self, state: PumpState, tick: Ticks, events: &mut Vec<PumpEvent>) {
        if self.last_state == Some(state) {
            return;
        }
        debug!(
            "pump at {}: {} -> {} at tick {tick}",
            self.host,
            self.last_state.map_or("none", PumpState::describe),
            state
        );
        events.push(PumpEvent::StateChanged {
            from: self.last_state,
            to: state,
            tick,
        });
        self.last_state = Some(state);
    }

    fn step<G: FluidGrid>(&mut self, grid: &mut G, tick: Ticks, events: &mut Vec<PumpEvent>) {
        let Some(pos) = self.cursor.advance() else {
            return;
        };
        self.energy
            .extract(self.config.energy_usage_per_move, Action::Execute);
        self.dirty.mark_cursor();

        if self.cursor.is_done() {
            debug!("pump at {}: sweep completed at tick {tick}", self.host);
            events.push(PumpEvent::SweepCompleted { tick });
            return;
        }

        trace!("pump at {}: scanning {pos}", self.host);
        self.transfer(grid, pos, tick, events);
    }

    /// Move one cell's worth of fluid into the tank, or nothing at all.
    fn transfer<G: FluidGrid>(
        &mut self,
        grid: &mut G,
        pos: Position,
        tick: Ticks,
        events: &mut Vec<PumpEvent>,
    ) {
        let Some(mut cell) = grid.lookup(pos) else {
            return;
        };
        let limit = self.buffer.capacity();
        let Some(offered) = cell
            .drain(limit, Action::Simulate)
            .filter(|stack| stack.amount > 0)
        else {
            return;
        };

        if self.buffer.fill_internal(&offered, Action::Simulate) != offered.amount {
            trace!(
                "pump at {}: tank refused {} of {:?} from {pos}",
                self.host, offered.amount, offered.kind
            );
            events.push(PumpEvent::TransferRejected { pos, offered, tick });
            return;
        }

        let Some(drained) = cell.drain(limit, Action::Execute) else {
            return;
        };
        let filled = self.buffer.fill_internal(&drained, Action::Execute);

        if self.config.replace_on_drain {
            cell.replace_with_solid();
        }
        self.energy
            .extract(self.config.energy_usage_per_drain, Action::Execute);

        trace!(
            "pump at {}: drained {filled} of {:?} from {pos}",
            self.host, drained.kind
        );
        events.push(PumpEvent::CellDrained {
            pos,
            fluid: drained.with_amount(filled),
            tick,
        });
    }
}

// ===========================================================================
// Tests
// ===========================================================================
