//! Configuration manager for loading and saving indicator configuration
//!
//! This module provides functionality to load and save configuration to
//! `$XDG_CONFIG_HOME/indicator/config.json` with atomic writes to prevent
//! corruption.

use crate::config::models::IndicatorConfig;
use crate::error::{IndicatorError, Result, StringError};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the configuration directory
    ///
    /// Returns: `$XDG_CONFIG_HOME/indicator`, or `./indicator` when unset
    pub fn get_config_dir() -> PathBuf {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from);
        base.join("indicator")
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.json")
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_path = Self::get_config_path();
        let config_dir = config_path
            .parent()
            .ok_or_else(|| IndicatorError::ConfigError(StringError::new("Invalid config path")))?;

        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist or is corrupt, returns default configuration.
    pub fn load() -> Result<IndicatorConfig> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            info!("Configuration file not found, using defaults");
            return Ok(IndicatorConfig::default());
        }

        let json = std::fs::read_to_string(&config_path)?;

        match serde_json::from_str(&json) {
            Ok(config) => {
                info!("Configuration loaded from {}", config_path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                Ok(IndicatorConfig::default())
            }
        }
    }

    /// Save configuration to disk with atomic write
    ///
    /// Writes a temporary file in the configuration directory and persists it
    /// over `config.json`, so readers never see a partial file.
    pub fn save(config: &IndicatorConfig) -> Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = Self::get_config_path();

        let json = serde_json::to_string_pretty(config)?;
        let mut temp = tempfile::NamedTempFile::new_in(&config_dir)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&config_path).map_err(|e| IndicatorError::IoError(e.error))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{XdgConfigGuard, create_test_dir};

    #[test]
    fn test_config_path() {
        let dir = create_test_dir();
        let _guard = XdgConfigGuard::new(&dir);

        let path = ConfigManager::get_config_path();
        assert_eq!(path, dir.path().join("indicator").join("config.json"));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = create_test_dir();
        let _guard = XdgConfigGuard::new(&dir);

        let config = ConfigManager::load().unwrap();
        assert_eq!(config, IndicatorConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = create_test_dir();
        let _guard = XdgConfigGuard::new(&dir);

        let mut config = IndicatorConfig::default();
        config.disabled_modules.push("more_notify".to_string());
        config.preferences.event_poll_interval_ms = 250;
        ConfigManager::save(&config).unwrap();

        assert_eq!(ConfigManager::load().unwrap(), config);

        // Only config.json remains; the temporary file was renamed over it
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("indicator"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_corrupt_config_falls_back_to_defaults() {
        let dir = create_test_dir();
        let _guard = XdgConfigGuard::new(&dir);

        let config_dir = ConfigManager::ensure_config_dir().unwrap();
        std::fs::write(config_dir.join("config.json"), "{ not json").unwrap();

        assert_eq!(ConfigManager::load().unwrap(), IndicatorConfig::default());
    }
}
