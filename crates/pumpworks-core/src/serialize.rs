//! Save and load support for pumps.
//!
//! A pump persists three things in a [`PumpRecord`]: the packed cursor
//! position, the stored energy, and the tank contents. Everything else is
//! either configuration or derived. Absent fields leave the matching state
//! untouched, so a pump loaded from an empty record re-anchors its sweep on
//! the next tick.
//!
//! The binary form is bitcode with a versioned [`SnapshotHeader`]. The
//! record itself is plain serde and can be embedded in any host format.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffer::FluidStack;
use crate::position::Position;
use crate::pump::PumpController;
use crate::sim::{Action, Ticks};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a pump snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x9D_4E_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur during deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// The persistent fields of a pump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpRecord {
    /// Cursor position, packed with [`Position::to_packed`].
    #[serde(default)]
    pub current_pos: Option<i64>,
    /// Stored energy.
    #[serde(default)]
    pub energy: Option<i32>,
    /// Tank contents. `None` is an empty tank.
    #[serde(default)]
    pub tank: Option<FluidStack>,
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every binary snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Tick counter at the time the snapshot was taken.
    pub tick: Ticks,
}

impl SnapshotHeader {
    pub fn new(tick: Ticks) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            tick,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PumpSave {
    header: SnapshotHeader,
    record: PumpRecord,
}

/// Decode a binary snapshot and validate its header.
pub fn decode_snapshot(data: &[u8]) -> Result<(SnapshotHeader, PumpRecord), DeserializeError> {
    let save: PumpSave =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    save.header.validate()?;
    Ok((save.header, save.record))
}

// ---------------------------------------------------------------------------
// PumpController persistence
// ---------------------------------------------------------------------------

impl PumpController {
    /// Capture the persistent fields. A cursor that has not yet settled on
    /// its start cell is written as absent, so the reload anchors and
    /// settles again instead of skipping the start cell.
    pub fn write_record(&self) -> PumpRecord {
        let current = self.cursor.current().filter(|_| !self.cursor.is_settling());
        PumpRecord {
            current_pos: current.map(Position::to_packed),
            energy: Some(i32::try_from(self.energy.stored()).unwrap_or(i32::MAX)),
            tank: self.buffer.fluid().copied(),
        }
    }

    /// Apply a record. Energy is re-applied through `receive`, so it adds to
    /// what is stored and clamps at capacity; negative values count as 0.
    /// Tank contents are clamped to capacity. Leaves the pump clean.
    pub fn read_record(&mut self, record: &PumpRecord) {
        if let Some(packed) = record.current_pos {
            self.cursor.restore(Position::from_packed(packed));
        }
        if let Some(energy) = record.energy {
            let amount = u32::try_from(energy).unwrap_or(0);
            self.energy.receive(amount, Action::Execute);
        }
        self.buffer.set_contents(record.tank);
        self.mark_clean();
        debug!(
            "pump at {}: loaded cursor {:?}, energy {}, tank {}",
            self.host,
            self.cursor.current(),
            self.energy.stored(),
            self.buffer.amount()
        );
    }

    /// Serialize to a binary snapshot via bitcode.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let save = PumpSave {
            header: SnapshotHeader::new(self.ticks),
            record: self.write_record(),
        };
        bitcode::serialize(&save).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Restore from a binary snapshot produced by [`serialize`](Self::serialize).
    ///
    /// The tick counter is taken from the header so throttled pumps keep
    /// their phase. On error the pump is left untouched.
    pub fn load(&mut self, data: &[u8]) -> Result<(), DeserializeError> {
        let (header, record) = decode_snapshot(data)?;
        self.read_record(&record);
        self.ticks = header.tick;
        Ok(())
    }
}
