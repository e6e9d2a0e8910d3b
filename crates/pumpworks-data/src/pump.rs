//! Pump configuration and saved-state files.
//!
//! A pump directory holds at most one `pump.{ron,toml,json}` config file and
//! optionally one `pump_state.{ron,toml,json}` record. A missing config file
//! means the defaults; a missing record means a fresh pump.

use std::path::{Path, PathBuf};

use log::debug;
use pumpworks_core::config::PumpConfig;
use pumpworks_core::position::Position;
use pumpworks_core::pump::PumpController;
use pumpworks_core::serialize::PumpRecord;

use crate::loader::{DataLoadError, deserialize_file, find_data_file};

/// Base name of the config file inside a pump directory.
pub const CONFIG_BASE_NAME: &str = "pump";

/// Base name of the saved-state file inside a pump directory.
pub const RECORD_BASE_NAME: &str = "pump_state";

// ===========================================================================
// Config
// ===========================================================================

/// Load and validate a pump config file. Fields missing from the file take
/// their defaults.
pub fn load_pump_config(path: &Path) -> Result<PumpConfig, DataLoadError> {
    let config: PumpConfig = deserialize_file(path)?;
    config.validate().map_err(|source| DataLoadError::Invalid {
        file: path.to_path_buf(),
        source,
    })?;
    debug!("loaded pump config from {}: {config:?}", path.display());
    Ok(config)
}

/// Look up `pump.{ron,toml,json}` in `dir`. Falls back to the default config
/// when no file exists.
pub fn find_pump_config(dir: &Path) -> Result<PumpConfig, DataLoadError> {
    match find_data_file(dir, CONFIG_BASE_NAME)? {
        Some(path) => load_pump_config(&path),
        None => {
            debug!("no pump config in {}, using defaults", dir.display());
            Ok(PumpConfig::default())
        }
    }
}

// ===========================================================================
// Saved state
// ===========================================================================

/// Load a saved pump record.
pub fn load_pump_record(path: &Path) -> Result<PumpRecord, DataLoadError> {
    deserialize_file(path)
}

/// Path of the saved-state file in `dir`, if one exists.
pub fn find_pump_record(dir: &Path) -> Result<Option<PathBuf>, DataLoadError> {
    find_data_file(dir, RECORD_BASE_NAME)
}

/// Build a pump at `host` from a pump directory: its config (or defaults)
/// and, when present, its saved state.
pub fn load_pump(dir: &Path, host: Position) -> Result<PumpController, DataLoadError> {
    let config = find_pump_config(dir)?;
    let mut pump = PumpController::new(host, config).map_err(|source| DataLoadError::Invalid {
        file: dir.to_path_buf(),
        source,
    })?;
    if let Some(path) = find_pump_record(dir)? {
        let record = load_pump_record(&path)?;
        pump.read_record(&record);
    }
    Ok(pump)
}
