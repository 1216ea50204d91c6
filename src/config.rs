//! Client configuration.
//!
//! Stored at ~/.config/stampcal/config.toml. Holds the refresh interval
//! and the shared image libraries the catalog fan-out fetches from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

static DEFAULT_POLL_INTERVAL: &str = "30s";

fn default_poll_interval() -> String {
    DEFAULT_POLL_INTERVAL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// How often the background refresh re-fetches everything,
    /// humantime-formatted ("30s", "5m").
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Shared image libraries to include in the catalog fan-out.
    #[serde(default)]
    pub image_libraries: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            poll_interval: default_poll_interval(),
            image_libraries: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("stampcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location; a missing file means defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: ClientConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Parsed poll interval; an unparseable value falls back to the default.
    pub fn poll_interval(&self) -> Duration {
        humantime::parse_duration(&self.poll_interval).unwrap_or_else(|_| {
            humantime::parse_duration(DEFAULT_POLL_INTERVAL).expect("default interval parses")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert!(config.image_libraries.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = ClientConfig {
            poll_interval: "5m".to_string(),
            image_libraries: vec!["animals".to_string(), "plants".to_string()],
        };
        config.save_to(&path).unwrap();

        let loaded = ClientConfig::load_from(&path).unwrap();
        assert_eq!(loaded.poll_interval(), Duration::from_secs(300));
        assert_eq!(loaded.image_libraries, config.image_libraries);
    }

    #[test]
    fn test_unparseable_interval_falls_back_to_default() {
        let config = ClientConfig {
            poll_interval: "whenever".to_string(),
            image_libraries: Vec::new(),
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "image_libraries = [\"animals\"]\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.image_libraries, vec!["animals".to_string()]);
    }
}
