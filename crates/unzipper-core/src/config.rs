//! Configuration module

use crate::{Error, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch extraction settings
    pub extract: ExtractConfig,
    /// Timer demo settings
    pub timers: TimerConfig,
}

/// Batch extraction configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Pause after each archive is extracted, in milliseconds (0 = none)
    pub settle_delay_ms: u64,
}

/// Timer demo configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// How long each timer sleeps, in milliseconds
    pub duration_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { duration_ms: 5_000 }
    }
}

impl ExtractConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl TimerConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Config {
    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| Error::Config("Unable to determine config directory".to_string()))?;

        Ok(config_dir.join("unzipper").join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            debug!(path = ?path, "No configuration file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Serialize configuration to TOML text
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extract.settle_delay_ms, 0);
        assert_eq!(config.timers.duration(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            extract: ExtractConfig {
                settle_delay_ms: 1_000,
            },
            timers: TimerConfig { duration_ms: 250 },
        };
        let toml_str = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("[extract]\nsettle_delay_ms = 1000\n").unwrap();
        assert_eq!(config.extract.settle_delay(), Duration::from_secs(1));
        assert_eq!(config.timers, TimerConfig::default());

        let empty = Config::from_toml("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml("[extract]\nsettle_delay_ms = \"soon\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[timers]\nduration_ms = 10\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timers.duration_ms, 10);
    }

    #[test]
    fn test_load_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load_from(&temp_dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
