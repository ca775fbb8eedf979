//! Configuration file management.
//!
//! Settings live in `thingy/config.toml` under the platform config directory
//! (`~/.config/thingy/config.toml` on Linux). Command-line flags always win
//! over config values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default device identifier (name fragment or address)
    #[serde(default)]
    pub device: Option<String>,

    /// Default scan timeout in seconds
    #[serde(default)]
    pub scan_timeout: Option<u64>,

    /// Number of chart points retained in the dashboard
    #[serde(default)]
    pub chart_capacity: Option<usize>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,
}

impl Config {
    /// Path to the config file, if a config directory exists on this platform.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("thingy").join("config.toml"))
    }

    /// Load the config from the default location.
    ///
    /// A missing file yields the default config; a malformed file is an error.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load the config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save the config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.device.is_none());
        assert!(!config.no_color);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thingy").join("config.toml");

        let config = Config {
            device: Some("Thingy".to_string()),
            scan_timeout: Some(10),
            chart_capacity: Some(300),
            no_color: true,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.device.as_deref(), Some("Thingy"));
        assert_eq!(loaded.scan_timeout, Some(10));
        assert_eq!(loaded.chart_capacity, Some(300));
        assert!(loaded.no_color);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "device = \"AA:BB:CC:DD:EE:FF\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.device.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert!(config.scan_timeout.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "device = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
