//! Configuration data models
//!
//! This module defines the data structures used for indicator configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Allowed range of the event poll interval in milliseconds
pub const POLL_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 10..=1000;

/// Top-level indicator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// User preferences
    pub preferences: Preferences,
    /// Names of modules left out of the registry
    pub disabled_modules: Vec<String>,
}

/// Preferences and tuning knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Number of modules initialized before the shell starts
    pub first_stage_modules: usize,
    /// Event loop wait timeout in milliseconds (10-1000)
    pub event_poll_interval_ms: u64,
    /// Directory icon images are resolved against
    pub resource_dir: PathBuf,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            first_stage_modules: crate::modules::FIRST_STAGE_MODULES,
            event_poll_interval_ms: 100,
            resource_dir: PathBuf::from("/usr/share/indicator/icons"),
        }
    }
}

impl Preferences {
    /// Event loop wait timeout, clamped to `POLL_INTERVAL_RANGE_MS`
    pub fn poll_interval(&self) -> std::time::Duration {
        let ms = self.event_poll_interval_ms.clamp(
            *POLL_INTERVAL_RANGE_MS.start(),
            *POLL_INTERVAL_RANGE_MS.end(),
        );
        std::time::Duration::from_millis(ms)
    }
}

impl IndicatorConfig {
    /// Whether the module called `name` is enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        !self.disabled_modules.iter().any(|disabled| disabled == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = IndicatorConfig::default();
        assert!(config.disabled_modules.is_empty());
        assert_eq!(config.preferences.first_stage_modules, 6);
        assert_eq!(config.preferences.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: IndicatorConfig =
            serde_json::from_str(r#"{"disabled_modules":["nfc"]}"#).unwrap();
        assert!(!config.is_enabled("nfc"));
        assert!(config.is_enabled("clock"));
        assert_eq!(config.preferences, Preferences::default());
    }

    #[test]
    fn test_poll_interval_is_clamped() {
        let mut prefs = Preferences {
            event_poll_interval_ms: 0,
            ..Preferences::default()
        };
        assert_eq!(prefs.poll_interval(), Duration::from_millis(10));

        prefs.event_poll_interval_ms = 60_000;
        assert_eq!(prefs.poll_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_serialization() {
        let config = IndicatorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: IndicatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
