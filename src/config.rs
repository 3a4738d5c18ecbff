//! Configuration for keysession.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to read keys from and where to log them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Input device node; auto-detected when unset
    #[serde(default)]
    pub device_path: Option<PathBuf>,

    /// Append-only key log
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keysession");

        Self {
            device_path: None,
            log_path: data_dir.join("keys.log"),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keysession")
            .join("config.json")
    }

    /// Apply command line overrides on top of the loaded values.
    pub fn with_overrides(mut self, device: Option<PathBuf>, log_file: Option<PathBuf>) -> Self {
        if device.is_some() {
            self.device_path = device;
        }
        if let Some(log_file) = log_file {
            self.log_path = log_file;
        }
        self
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.device_path.is_none());
        assert!(config.log_path.ends_with("keysession/keys.log"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(
            Some(PathBuf::from("/dev/input/event4")),
            Some(PathBuf::from("/tmp/k.log")),
        );
        assert_eq!(config.device_path, Some(PathBuf::from("/dev/input/event4")));
        assert_eq!(config.log_path, PathBuf::from("/tmp/k.log"));

        let kept = config.clone().with_overrides(None, None);
        assert_eq!(kept, config);
    }

    #[test]
    fn test_parse_without_device() {
        let config = Config::from_json(r#"{ "log_path": "/var/log/keys.log" }"#).unwrap();
        assert!(config.device_path.is_none());
        assert_eq!(config.log_path, PathBuf::from("/var/log/keys.log"));

        assert!(matches!(
            Config::from_json("not json"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
