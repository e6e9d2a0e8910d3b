//! Pump configuration.
//!
//! A [`PumpConfig`] is fixed when a pump is built. Every field has a
//! default, so partial configuration files only need to name what they
//! change. Call [`PumpConfig::validate`] after loading; the controller
//! refuses invalid configs.

use serde::{Deserialize, Serialize};

use crate::buffer::UNIT_VOLUME;

/// Largest accepted `range`. Keeps every swept coordinate well inside the
/// 26-bit packed x/z fields.
pub const MAX_RANGE: u32 = 1 << 20;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("range must be positive")]
    ZeroRange,
    #[error("range {0} exceeds the maximum of {MAX_RANGE}")]
    RangeTooLarge(u32),
    #[error("energy capacity must be positive")]
    ZeroEnergyCapacity,
    #[error("tank capacity {0} is smaller than one unit ({UNIT_VOLUME})")]
    TankSmallerThanUnit(u32),
}

// ---------------------------------------------------------------------------
// PumpConfig
// ---------------------------------------------------------------------------

/// Behaviour and limits shared by every pump built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpConfig {
    /// Edge length of the swept area in x and z.
    pub range: u32,
    /// Work happens every `speed` ticks. 0 means every tick.
    pub speed: u32,
    /// Tank capacity.
    pub tank_capacity: u32,
    /// Energy store capacity.
    pub energy_capacity: u32,
    /// Energy debited per cursor move.
    pub energy_usage_per_move: u32,
    /// Energy debited per committed drain.
    pub energy_usage_per_drain: u32,
    /// When false the energy store is topped up every tick.
    pub uses_energy: bool,
    /// Replace drained cells with an inert solid.
    pub replace_on_drain: bool,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            range: 64,
            speed: 8,
            tank_capacity: 32_000,
            energy_capacity: 32_000,
            energy_usage_per_move: 0,
            energy_usage_per_drain: 100,
            uses_energy: true,
            replace_on_drain: true,
        }
    }
}

impl PumpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.range == 0 {
            return Err(ConfigError::ZeroRange);
        }
        if self.range > MAX_RANGE {
            return Err(ConfigError::RangeTooLarge(self.range));
        }
        if self.energy_capacity == 0 {
            return Err(ConfigError::ZeroEnergyCapacity);
        }
        if self.tank_capacity < UNIT_VOLUME {
            return Err(ConfigError::TankSmallerThanUnit(self.tank_capacity));
        }
        Ok(())
    }
}
