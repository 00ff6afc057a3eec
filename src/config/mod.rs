//! # Configuration Management Module
//!
//! Settings for where LifeHUD keeps its state and how it logs.
//!
//! ## Configuration Structure
//!
//! - [`StorageConfig`] - data directory and the key the state blob lives under
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lifehud::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration from file
//!     let config = Config::load("lifehud.toml").await?;
//!     println!("Data dir: {}", config.storage.data_dir);
//!
//!     // Create default configuration
//!     Config::create_default("lifehud.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [storage]
//! data_dir = "./data"
//! state_key = "lifehud_state"
//!
//! [logging]
//! level = "info"
//! file = "lifehud.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::hud::STORAGE_KEY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Key the state blob is written under. Changing it starts from fresh seed data.
    #[serde(default = "default_state_key")]
    pub state_key: String,
}

fn default_state_key() -> String {
    STORAGE_KEY.to_string()
}

impl StorageConfig {
    /// Directory of the sled database, `<data_dir>/lifehud`.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("lifehud")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Configured level as a filter. Unknown names fall back to `info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" | "warning" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => {
                eprintln!("Invalid log level '{}', defaulting to info", self.level);
                log::LevelFilter::Info
            }
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                state_key: default_state_key(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("lifehud.log".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.storage.data_dir, "./data");
        assert_eq!(config.storage.state_key, "lifehud_state");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_state_key_defaults_when_missing() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            data_dir = "/tmp/hud"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.state_key, STORAGE_KEY);
        assert!(config.logging.file.is_none());
        assert_eq!(config.logging.level_filter(), log::LevelFilter::Debug);
        assert_eq!(config.storage.db_path(), PathBuf::from("/tmp/hud").join("lifehud"));
    }

    #[test]
    fn test_invalid_level_defaults_to_info() {
        let logging = LoggingConfig {
            level: "loud".to_string(),
            file: None,
        };
        assert_eq!(logging.level_filter(), log::LevelFilter::Info);
    }

    #[tokio::test]
    async fn test_create_default_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lifehud.toml");
        let path = path.to_str().unwrap();
        Config::create_default(path).await.unwrap();
        let loaded = Config::load(path).await.unwrap();
        assert_eq!(loaded.storage.data_dir, "./data");
        assert_eq!(loaded.logging.file.as_deref(), Some("lifehud.log"));
    }
}
