//! Configuration management for the americano crate
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, SchedulerSettings, ServiceSettings, StorageSettings};
pub use rating::RatingConfig;
