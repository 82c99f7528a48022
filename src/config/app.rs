//! Main application configuration
//!
//! This module defines the primary configuration structures, including
//! environment variable loading, TOML file loading and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub scheduler: SchedulerSettings,
    pub rating: RatingConfig,
    pub storage: StorageSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Round generation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Seed for pairing tie-breaks and shuffles; entropy when absent
    pub seed: Option<u64>,
    /// Shuffle the roster once when a tournament starts
    pub shuffle_roster: bool,
}

/// Persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding players.json and matches.json
    pub data_dir: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "americano".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Scheduler settings
        if let Ok(seed) = env::var("SCHEDULER_SEED") {
            self.scheduler.seed = Some(
                seed.parse()
                    .map_err(|_| anyhow!("Invalid SCHEDULER_SEED value: {}", seed))?,
            );
        }
        if let Ok(shuffle) = env::var("SHUFFLE_ROSTER") {
            self.scheduler.shuffle_roster = shuffle
                .parse()
                .map_err(|_| anyhow!("Invalid SHUFFLE_ROSTER value: {}", shuffle))?;
        }

        // Rating settings
        if let Ok(rating) = env::var("STARTING_RATING") {
            self.rating.starting_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid STARTING_RATING value: {}", rating))?;
        }
        if let Ok(matches) = env::var("PROVISIONAL_MATCHES") {
            self.rating.provisional_matches = matches
                .parse()
                .map_err(|_| anyhow!("Invalid PROVISIONAL_MATCHES value: {}", matches))?;
        }

        // Storage settings
        if let Ok(dir) = env::var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    if config.storage.data_dir.as_os_str().is_empty() {
        return Err(anyhow!("Data directory cannot be empty"));
    }

    config.rating.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.service.name, "americano");
        assert_eq!(config.scheduler.seed, None);
        assert!(!config.scheduler.shuffle_roster);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [scheduler]
            seed = 42
            shuffle_roster = true

            [rating]
            starting_rating = 1200
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduler.seed, Some(42));
        assert!(config.scheduler.shuffle_roster);
        assert_eq!(config.rating.starting_rating, 1200);
        assert_eq!(config.rating.k_new, 32.0);
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_invalid_rating_section_rejected() {
        let mut config = AppConfig::default();
        config.rating.k_new = -4.0;
        assert!(validate_config(&config).is_err());
    }
}
