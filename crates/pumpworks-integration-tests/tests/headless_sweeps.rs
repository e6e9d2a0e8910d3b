//! Headless pump scenarios: full sweeps, energy budgets, throttling, power
//! gating, and save/load continuation.

use pumpworks_core::buffer::FluidStack;
use pumpworks_core::capability::{Capability, CapabilityKind};
use pumpworks_core::config::PumpConfig;
use pumpworks_core::event::PumpEvent;
use pumpworks_core::position::{Position, Region};
use pumpworks_core::pump::PumpController;
use pumpworks_core::serialize::PumpRecord;
use pumpworks_core::sim::Action;
use pumpworks_core::state::PumpState;
use pumpworks_core::test_utils::*;

fn transitions(events: &[PumpEvent]) -> Vec<PumpState> {
    events
        .iter()
        .filter_map(|e| match e {
            PumpEvent::StateChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

fn drained_count(events: &[PumpEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, PumpEvent::CellDrained { .. }))
        .count()
}

fn charge(pump: &mut PumpController, amount: u32) -> u32 {
    pump.query_capability(CapabilityKind::Energy)
        .and_then(Capability::into_energy)
        .map_or(0, |energy| energy.receive(amount, Action::Execute))
}

/// A config whose tank never fills during a sweep of `range`.
fn roomy_config(range: u32, host: Position) -> PumpConfig {
    let cells = Region::around(host, range).cell_count();
    PumpConfig {
        tank_capacity: u32::try_from((cells + 1) * 1_000).unwrap(),
        ..eager_config(range)
    }
}

// ===========================================================================
// Traversal
// ===========================================================================

#[test]
fn cursor_walks_down_then_across() {
    // Host chosen so the sweep anchors at (0, 10, 0).
    let host = Position::new(1, 11, 1);
    let mut pump = make_pump(host, eager_config(3));
    let mut grid = TestGrid::new();
    let power = always_powered();

    pump.tick(&mut grid, &power);
    assert_eq!(pump.start_position(), Some(Position::new(0, 10, 0)));
    assert_eq!(pump.current_position(), Some(Position::new(0, 10, 0)));

    pump.tick(&mut grid, &power);
    assert_eq!(pump.current_position(), Some(Position::new(0, 9, 0)));

    // y runs 10 down to 1, then the next column starts back at the top.
    run(&mut pump, &mut grid, &power, 8);
    assert_eq!(pump.current_position(), Some(Position::new(0, 1, 0)));
    pump.tick(&mut grid, &power);
    assert_eq!(pump.current_position(), Some(Position::new(1, 10, 0)));
}

#[test]
fn flooded_region_drains_every_cell_once_in_order() {
    let host = Position::new(0, 6, 0);
    let range = 4;
    let region = Region::around(host, range);
    let mut pump = make_pump(host, roomy_config(range, host));
    let mut grid = TestGrid::new();
    grid.fill_region(&region, water());

    let cycles = run_to_completion(&mut pump, &mut grid, &always_powered(), 10_000);

    assert_eq!(cycles, region.cell_count() + 1);
    assert_eq!(grid.drained(), region.cells().collect::<Vec<_>>());
    assert_eq!(grid.source_count(), 0);
    assert_eq!(
        pump.buffer().fluid(),
        Some(&FluidStack::new(water(), region.cell_count() as u32 * 1_000))
    );
    assert!(region.cells().all(|pos| grid.get(pos) == Some(TestCell::Solid)));
}

#[test]
fn done_is_terminal() {
    let host = Position::new(0, 3, 0);
    let mut pump = make_pump(host, roomy_config(2, host));
    let mut grid = TestGrid::new();
    let power = always_powered();
    run_to_completion(&mut pump, &mut grid, &power, 1_000);
    let end = pump.current_position();

    // Fluid flowing back in after completion is ignored.
    grid.fill_region(&Region::around(host, 2), lava());
    let events = run(&mut pump, &mut grid, &power, 50);

    assert_eq!(pump.state(&power), PumpState::Done);
    assert_eq!(pump.current_position(), end);
    assert_eq!(drained_count(&events), 0);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, PumpEvent::SweepCompleted { .. }))
    );
}

#[test]
fn cells_without_a_full_unit_are_skipped() {
    let host = Position::new(0, 3, 0);
    let region = Region::around(host, 2);
    let mut pump = make_pump(host, roomy_config(2, host));
    let mut grid = TestGrid::new();
    for pos in region.cells() {
        grid.set(pos, TestCell::Flowing(water()));
    }

    run_to_completion(&mut pump, &mut grid, &always_powered(), 1_000);

    assert!(grid.drained().is_empty());
    assert!(pump.buffer().is_empty());
    assert!(region.cells().all(|pos| grid.get(pos) == Some(TestCell::Flowing(water()))));
}

// ===========================================================================
// Tank
// ===========================================================================

#[test]
fn unit_sized_tank_is_full_with_any_content() {
    let host = Position::new(0, 5, 0);
    let config = PumpConfig {
        tank_capacity: 1_000,
        ..eager_config(3)
    };
    let mut pump = make_pump(host, config);
    pump.read_record(&PumpRecord {
        tank: Some(FluidStack::new(water(), 1)),
        ..PumpRecord::default()
    });

    let mut grid = TestGrid::new();
    grid.fill_region(&Region::around(host, 3), water());
    let events = run(&mut pump, &mut grid, &always_powered(), 10);

    assert_eq!(transitions(&events), vec![PumpState::Full]);
    assert!(grid.drained().is_empty());
}

#[test]
fn mixed_fluids_stall_until_the_tank_is_emptied() {
    let host = Position::new(0, 2, 0);
    let mut pump = make_pump(host, roomy_config(2, host));
    let region = Region::around(host, 2);
    let cells: Vec<Position> = region.cells().collect();
    let mut grid = TestGrid::new();
    grid.set(cells[0], TestCell::Source(water()));
    grid.set(cells[1], TestCell::Source(lava()));
    let power = always_powered();

    let events = run(&mut pump, &mut grid, &power, 2);
    assert_eq!(drained_count(&events), 1);
    assert!(events.iter().any(|e| matches!(
        e,
        PumpEvent::TransferRejected { pos, .. } if *pos == cells[1]
    )));
    assert_eq!(grid.get(cells[1]), Some(TestCell::Source(lava())));

    // An external consumer empties the tank; the sweep moves on without
    // revisiting the skipped cell.
    let taken = pump
        .query_capability(CapabilityKind::Fluid)
        .and_then(Capability::into_fluid)
        .and_then(|tank| tank.drain(u32::MAX, Action::Execute));
    assert_eq!(taken, Some(FluidStack::new(water(), 1_000)));
    run_to_completion(&mut pump, &mut grid, &power, 100);
    assert_eq!(grid.get(cells[1]), Some(TestCell::Source(lava())));
}

// ===========================================================================
// Energy
// ===========================================================================

#[test]
fn energy_budget_runs_dry_and_recovers() {
    let host = Position::new(0, 6, 0);
    let config = PumpConfig {
        range: 4,
        speed: 0,
        energy_capacity: 1_000,
        energy_usage_per_move: 10,
        energy_usage_per_drain: 100,
        ..PumpConfig::default()
    };
    let mut pump = make_pump(host, config);
    let mut grid = TestGrid::new();
    grid.fill_region(&Region::around(host, 4), water());
    let power = always_powered();

    assert_eq!(charge(&mut pump, 250), 250);
    let events = run(&mut pump, &mut grid, &power, 10);

    // 250 pays for two full cycles and part of a third.
    assert_eq!(grid.drained().len(), 3);
    assert_eq!(pump.energy().stored(), 0);
    assert_eq!(
        transitions(&events),
        vec![PumpState::Working, PumpState::NoEnergy]
    );

    assert_eq!(charge(&mut pump, 5_000), 1_000);
    let events = run(&mut pump, &mut grid, &power, 1);
    assert_eq!(transitions(&events), vec![PumpState::Working]);
    assert_eq!(grid.drained().len(), 4);
}

#[test]
fn energy_free_pump_never_reports_no_energy() {
    let host = Position::new(0, 6, 0);
    let config = PumpConfig {
        range: 4,
        speed: 0,
        uses_energy: false,
        energy_usage_per_move: 50_000,
        energy_usage_per_drain: 50_000,
        ..PumpConfig::default()
    };
    let mut pump = make_pump(host, config);
    let mut grid = TestGrid::new();
    grid.fill_region(&Region::around(host, 4), water());

    let events = run(&mut pump, &mut grid, &always_powered(), 40);
    assert!(!transitions(&events).contains(&PumpState::NoEnergy));
    assert_eq!(grid.drained().len(), 32);
}

// ===========================================================================
// Throttle and power
// ===========================================================================

#[test]
fn throttle_limits_work_to_due_ticks() {
    let host = Position::new(0, 6, 0);
    let config = PumpConfig {
        speed: 4,
        ..roomy_config(4, host)
    };
    let mut pump = make_pump(host, config);
    let mut grid = TestGrid::new();
    grid.fill_region(&Region::around(host, 4), water());

    let events = run(&mut pump, &mut grid, &always_powered(), 12);
    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            PumpEvent::CellDrained { tick, .. } => Some(*tick),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![0, 4, 8]);
}

#[test]
fn power_signal_gates_work() {
    let host = Position::new(0, 6, 0);
    let mut pump = make_pump(host, roomy_config(4, host));
    let mut grid = TestGrid::new();
    grid.fill_region(&Region::around(host, 4), water());
    let mut power = TestPower::new();

    let events = run(&mut pump, &mut grid, &power, 5);
    assert_eq!(transitions(&events), vec![PumpState::Unpowered]);
    assert!(grid.drained().is_empty());

    // The signal is read at the host, not anywhere else.
    power.set(host.down(), true);
    run(&mut pump, &mut grid, &power, 5);
    assert!(grid.drained().is_empty());

    power.set(host, true);
    let events = run(&mut pump, &mut grid, &power, 5);
    assert_eq!(transitions(&events), vec![PumpState::Working]);
    assert_eq!(grid.drained().len(), 5);
}

// ===========================================================================
// Save / load
// ===========================================================================

#[test]
fn snapshot_mid_sweep_continues_identically() {
    let host = Position::new(0, 5, 0);
    let config = PumpConfig {
        speed: 3,
        ..roomy_config(3, host)
    };
    let region = Region::around(host, 3);
    let power = always_powered();

    let mut original = make_pump(host, config);
    let mut grid = TestGrid::new();
    grid.fill_region(&region, water());
    run(&mut original, &mut grid, &power, 20);

    let data = original.serialize().unwrap();
    let mut restored = make_pump(host, config);
    restored.load(&data).unwrap();
    let mut restored_grid = grid.clone();

    run_to_completion(&mut original, &mut grid, &power, 1_000);
    run_to_completion(&mut restored, &mut restored_grid, &power, 1_000);

    assert_eq!(grid.drained(), restored_grid.drained());
    assert_eq!(grid.drained().len() as u64, region.cell_count());
    assert_eq!(original.buffer().fluid(), restored.buffer().fluid());
    assert_eq!(original.ticks(), restored.ticks());
}

#[test]
fn record_survives_json_and_resumes_without_rescanning() {
    let host = Position::new(0, 5, 0);
    let region = Region::around(host, 3);
    let power = always_powered();

    let mut pump = make_pump(host, roomy_config(3, host));
    let mut grid = TestGrid::new();
    grid.fill_region(&region, water());
    run(&mut pump, &mut grid, &power, 10);
    let drained_before = grid.drained().len();

    let json = serde_json::to_string(&pump.write_record()).unwrap();
    let record: PumpRecord = serde_json::from_str(&json).unwrap();
    let mut resumed = make_pump(host, roomy_config(3, host));
    resumed.read_record(&record);

    run_to_completion(&mut resumed, &mut grid, &power, 1_000);
    assert_eq!(drained_before, 10);
    assert_eq!(grid.drained().len() as u64, region.cell_count());
    assert_eq!(
        resumed.buffer().amount(),
        u32::try_from(region.cell_count()).unwrap() * 1_000
    );
}
