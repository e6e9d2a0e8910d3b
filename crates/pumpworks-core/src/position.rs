//! Grid positions and the swept region.
//!
//! [`Position`] is an immutable integer triple that packs into a single
//! `i64` for persistence. [`Region`] describes the cuboid a pump sweeps and
//! can enumerate its cells in scan order.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Packing layout
// ---------------------------------------------------------------------------

const NUM_X_BITS: u32 = 26;
const NUM_Z_BITS: u32 = 26;
const NUM_Y_BITS: u32 = 64 - NUM_X_BITS - NUM_Z_BITS;
const Y_SHIFT: u32 = NUM_Z_BITS;
const X_SHIFT: u32 = Y_SHIFT + NUM_Y_BITS;
const X_MASK: i64 = (1 << NUM_X_BITS) - 1;
const Y_MASK: i64 = (1 << NUM_Y_BITS) - 1;
const Z_MASK: i64 = (1 << NUM_Z_BITS) - 1;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A cell position in the 3-D grid. `y` is the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return a new position shifted by the given deltas.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The cell directly below.
    pub fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Pack into a signed 64-bit integer: 26 bits x, 12 bits y, 26 bits z.
    ///
    /// Coordinates outside the representable range are truncated to their
    /// low bits.
    pub fn to_packed(self) -> i64 {
        ((i64::from(self.x) & X_MASK) << X_SHIFT)
            | ((i64::from(self.y) & Y_MASK) << Y_SHIFT)
            | (i64::from(self.z) & Z_MASK)
    }

    /// Inverse of [`to_packed`](Self::to_packed). Each field is sign-extended.
    pub fn from_packed(packed: i64) -> Self {
        let x = (packed << (64 - X_SHIFT - NUM_X_BITS)) >> (64 - NUM_X_BITS);
        let y = (packed << (64 - Y_SHIFT - NUM_Y_BITS)) >> (64 - NUM_Y_BITS);
        let z = (packed << (64 - NUM_Z_BITS)) >> (64 - NUM_Z_BITS);
        Self::new(x as i32, y as i32, z as i32)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// The volume a pump sweeps: `range` columns along x, `range + 1` slices
/// along z, each column running from `start.y` down to `y = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub start: Position,
    pub range: u32,
}

impl Region {
    pub fn new(start: Position, range: u32) -> Self {
        Self { start, range }
    }

    /// The region a pump at `host` sweeps: centred on the host in x and z,
    /// starting one cell below it.
    pub fn around(host: Position, range: u32) -> Self {
        let half = (range / 2) as i32;
        Self::new(host.offset(-half, -1, -half), range)
    }

    #[inline]
    fn span(&self) -> i32 {
        self.range as i32
    }

    /// Lowest y visited in every column.
    pub fn floor(&self) -> i32 {
        self.start.y.min(1)
    }

    /// First x past the last column of a slice.
    pub fn x_end(&self) -> i32 {
        self.start.x + self.span()
    }

    /// The z of the slice past the last one scanned. Entering it marks the
    /// sweep complete.
    pub fn sentinel_z(&self) -> i32 {
        self.start.z + self.span() + 1
    }

    /// Returns `true` if `pos` is a cell the sweep visits.
    pub fn contains(&self, pos: Position) -> bool {
        (self.start.x..self.x_end()).contains(&pos.x)
            && (self.floor()..=self.start.y).contains(&pos.y)
            && (self.start.z..self.sentinel_z()).contains(&pos.z)
    }

    /// Number of cells the sweep visits.
    pub fn cell_count(&self) -> u64 {
        let columns = u64::from(self.range) * (u64::from(self.range) + 1);
        let height = (self.start.y - self.floor() + 1) as u64;
        columns * height
    }

    /// Iterate every cell in scan order: z slices outermost, then x
    /// columns, then y from the top of the column down.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let start = self.start;
        let floor = self.floor();
        let x_end = self.x_end();
        let z_last = start.z + self.span();
        (start.z..=z_last).flat_map(move |z| {
            (start.x..x_end).flat_map(move |x| {
                (floor..=start.y).rev().map(move |y| Position::new(x, y, z))
            })
        })
    }
}
