//! Application configuration

use crate::core::RateHint;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Backend id used to enumerate sensors
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Sampling-rate hint used for registrations
    #[serde(default)]
    pub rate: RateHint,
    /// Base cadence of the poll loop, in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Name of the sensor selected when the app last exited
    #[serde(default)]
    pub last_sensor: Option<String>,
}

fn default_version() -> u32 {
    1
}

fn default_backend() -> String {
    "hwmon".to_string()
}

fn default_tick_ms() -> u64 {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            backend: default_backend(),
            rate: RateHint::default(),
            tick_ms: default_tick_ms(),
            last_sensor: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("io", "sens-probe", "sens-probe")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trips_through_json() {
        let config = AppConfig {
            backend: "simulated".to_string(),
            rate: RateHint::Normal,
            last_sensor: Some("Sine Wave".to_string()),
            ..AppConfig::default()
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.backend, "simulated");
        assert_eq!(restored.rate, RateHint::Normal);
        assert_eq!(restored.last_sensor.as_deref(), Some("Sine Wave"));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.version, 1);
        assert_eq!(config.backend, "hwmon");
        assert_eq!(config.rate, RateHint::Ui);
        assert_eq!(config.tick_ms, 20);
        assert_eq!(config.last_sensor, None);
    }
}
