//! Pump configuration and saved-state loading from RON, TOML or JSON files.

pub mod loader;
pub mod pump;

pub use loader::{DataLoadError, Format};
pub use pump::{find_pump_config, load_pump, load_pump_config, load_pump_record};
