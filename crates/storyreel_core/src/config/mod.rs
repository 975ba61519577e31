//! Configuration management for Storyreel.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use storyreel_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new("storyreel.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Temp root: {}", config.settings().paths.temp_root);
//!
//! config.settings_mut().logging.compact = false;
//! config.update_section(ConfigSection::Logging).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, NarrationSettings, PathSettings, Settings, ToolSettings,
    VideoSettings,
};
