//! The scan cursor: a stateful walker over a [`Region`].
//!
//! The cursor starts uninitialized. [`ScanCursor::initialize`] anchors the
//! region around the host and seats `current` on the first cell in a
//! *settling* state; the next [`ScanCursor::advance`] consumes that state
//! without moving, so the first cell is visited like any other.
//!
//! Each later advance steps one cell down the current column. Below `y = 1`
//! it jumps to the top of the next column, and past the last column it
//! wraps to the first column of the next z slice. The sweep is complete
//! once `current` enters the slice at [`Region::sentinel_z`].

use serde::{Deserialize, Serialize};

use crate::position::{Position, Region};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCursor {
    range: u32,
    start: Option<Position>,
    current: Option<Position>,
    settling: bool,
}

impl ScanCursor {
    pub fn new(range: u32) -> Self {
        Self {
            range,
            start: None,
            current: None,
            settling: false,
        }
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn current(&self) -> Option<Position> {
        self.current
    }

    /// The swept region, once the start has been anchored.
    pub fn region(&self) -> Option<Region> {
        self.start.map(|start| Region::new(start, self.range))
    }

    /// Both `start` and `current` are set.
    pub fn is_initialized(&self) -> bool {
        self.start.is_some() && self.current.is_some()
    }

    /// The next advance will stay on the first cell.
    pub fn is_settling(&self) -> bool {
        self.settling
    }

    /// Anchor `start` around `host` and seat `current`, whichever are
    /// missing. Returns `true` if `current` was seated by this call.
    pub fn initialize(&mut self, host: Position) -> bool {
        let range = self.range;
        let start = *self
            .start
            .get_or_insert_with(|| Region::around(host, range).start);
        if self.current.is_some() {
            return false;
        }
        self.current = Some(start);
        self.settling = true;
        true
    }

    /// Re-seat a persisted position. The settle step is not replayed.
    pub fn restore(&mut self, current: Position) {
        self.current = Some(current);
        self.settling = false;
    }

    /// `current` sits on the sentinel slice past the last scanned one.
    pub fn is_done(&self) -> bool {
        match (self.region(), self.current) {
            (Some(region), Some(current)) => current.z == region.sentinel_z(),
            _ => false,
        }
    }

    /// Move to the next cell in scan order and return it. Returns `None`
    /// while the cursor is uninitialized.
    pub fn advance(&mut self) -> Option<Position> {
        let region = self.region()?;
        let mut next = self.current?;
        let start = region.start;

        if self.settling {
            self.settling = false;
        } else if next.y - 1 < 1 {
            next = Position::new(next.x + 1, start.y, next.z);
        } else {
            next = next.down();
        }

        if next.x >= region.x_end() {
            next = Position::new(start.x, start.y, next.z + 1);
        }

        self.current = Some(next);
        Some(next)
    }
}
