//! Drain-a-lake example: one pump sweeping a small flooded basin.
//!
//! Floods a range-5 basin three cells deep, runs the pump until the sweep
//! completes, printing every state transition, then saves mid-sweep and
//! resumes from the snapshot.
//!
//! Run with: `cargo run -p pumpworks-core --example drain_lake`

use pumpworks_core::config::PumpConfig;
use pumpworks_core::event::PumpEvent;
use pumpworks_core::position::{Position, Region};
use pumpworks_core::pump::PumpController;
use pumpworks_core::test_utils::*;

fn main() {
    let host = Position::new(0, 4, 0);
    let config = PumpConfig {
        range: 5,
        speed: 2,
        tank_capacity: 100_000,
        uses_energy: false,
        ..PumpConfig::default()
    };
    let mut pump = PumpController::new(host, config).unwrap();

    let region = Region::around(host, config.range);
    let mut grid = TestGrid::new();
    grid.fill_region(&region, water());
    println!(
        "Basin: {} cells from {} ({} sources)",
        region.cell_count(),
        region.start,
        grid.source_count()
    );

    let power = always_powered();
    let mut saved = None;
    for _ in 0..500 {
        let events = pump.tick(&mut grid, &power);
        for event in &events {
            match event {
                PumpEvent::StateChanged { from, to, tick } => {
                    println!("  tick {tick:>3}: {from:?} -> {to}");
                }
                PumpEvent::SweepCompleted { tick } => {
                    println!("  tick {tick:>3}: sweep completed");
                }
                _ => {}
            }
        }
        if pump.ticks() == 40 {
            saved = Some(pump.serialize().unwrap());
        }
        if events
            .iter()
            .any(|e| matches!(e, PumpEvent::SweepCompleted { .. }))
        {
            break;
        }
    }

    println!(
        "Drained {} cells, tank holds {}/{} mB",
        grid.drained().len(),
        pump.buffer().amount(),
        pump.buffer().capacity()
    );

    if let Some(data) = saved {
        let mut resumed = PumpController::new(host, config).unwrap();
        resumed.load(&data).unwrap();
        println!(
            "Snapshot ({} bytes) resumes at {:?} on tick {} with {} mB",
            data.len(),
            resumed.current_position(),
            resumed.ticks(),
            resumed.buffer().amount()
        );
    }
}
