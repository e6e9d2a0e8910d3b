//! Pumpworks Core -- a ranged, energy-budgeted fluid pump automaton.
//!
//! A pump sweeps a fixed cuboid below itself one cell per working cycle,
//! drains each fluid source it finds into its tank, and reports its status
//! every cycle. The fluid grid and the power signal belong to the host and
//! are reached through the traits in [`world`].
//!
//! # Cycle
//!
//! Each call to [`pump::PumpController::tick`] runs one cycle:
//!
//! 1. **Top-up** -- fill the energy store when energy accounting is off.
//! 2. **Anchor** -- on first use, anchor the sweep and seat the cursor.
//! 3. **Evaluate** -- derive [`state::PumpState`] from a fresh snapshot.
//! 4. **Move** -- when working and the throttle is due, advance the cursor.
//! 5. **Transfer** -- drain the cell under the cursor, all or nothing.
//! 6. **Bookkeeping** -- collect dirty flags and increment the tick counter.
//!
//! # Key Types
//!
//! - [`pump::PumpController`] -- owns one pump's entire state and runs cycles.
//! - [`cursor::ScanCursor`] -- walks the swept [`position::Region`].
//! - [`energy::EnergyBudget`] -- saturating energy store.
//! - [`buffer::ResourceBuffer`] -- single-kind fluid tank.
//! - [`state::evaluate`] -- pure snapshot-to-state function.
//! - [`serialize`] -- record and binary snapshot persistence via bitcode.

pub mod buffer;
pub mod capability;
pub mod config;
pub mod cursor;
pub mod dirty;
pub mod energy;
pub mod event;
pub mod id;
pub mod position;
pub mod pump;
pub mod serialize;
pub mod sim;
pub mod state;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
