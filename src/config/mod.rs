//! Configuration management module
//!
//! This module handles loading, saving, and managing indicator configuration.
//! Configuration is stored in `$XDG_CONFIG_HOME/indicator/config.json` with
//! atomic writes to prevent corruption.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::{IndicatorConfig, POLL_INTERVAL_RANGE_MS, Preferences};
