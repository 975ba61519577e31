//! Logging types and configuration.

use serde::{Deserialize, Serialize};

use crate::config::LoggingSettings;

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace-level debugging (very verbose).
    Trace,
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl LogLevel {
    /// Convert to tracing level.
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Configuration for run-logger behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to output.
    pub level: LogLevel,
    /// Compact mode: tool output only kept in the tail buffer.
    pub compact: bool,
    /// Number of tool-output lines replayed on error.
    pub error_tail: usize,
    /// Show timestamps in log output.
    pub show_timestamps: bool,
    /// Echo log lines to stderr in addition to the log file.
    pub echo: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            error_tail: 20,
            show_timestamps: true,
            echo: false,
        }
    }
}

impl LogConfig {
    /// Derive a log config from the settings file section.
    pub fn from_settings(settings: &LoggingSettings, echo: bool) -> Self {
        Self {
            level: LogLevel::Info,
            compact: settings.compact,
            error_tail: settings.error_tail,
            show_timestamps: settings.show_timestamps,
            echo,
        }
    }

    /// Create a debug configuration (verbose, no compact).
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
            compact: false,
            error_tail: 50,
            show_timestamps: true,
            echo: false,
        }
    }
}

/// Message prefix types for consistent formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePrefix {
    /// Shell command: `$ command`
    Command,
    /// Phase marker: `=== Phase ===`
    Phase,
    /// Section marker: `--- Section ---`
    Section,
    /// Success: `[SUCCESS]`
    Success,
    /// Warning: `[WARNING]`
    Warning,
    /// Error: `[ERROR]`
    Error,
    /// Debug: `[DEBUG]`
    Debug,
    /// No prefix
    None,
}

impl MessagePrefix {
    /// Format a message with this prefix.
    pub fn format(&self, message: &str) -> String {
        match self {
            MessagePrefix::Command => format!("$ {}", message),
            MessagePrefix::Phase => format!("=== {} ===", message),
            MessagePrefix::Section => format!("--- {} ---", message),
            MessagePrefix::Success => format!("[SUCCESS] {}", message),
            MessagePrefix::Warning => format!("[WARNING] {}", message),
            MessagePrefix::Error => format!("[ERROR] {}", message),
            MessagePrefix::Debug => format!("[DEBUG] {}", message),
            MessagePrefix::None => message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_formats() {
        assert_eq!(MessagePrefix::Command.format("ffmpeg -y"), "$ ffmpeg -y");
        assert_eq!(MessagePrefix::Phase.format("Render"), "=== Render ===");
        assert_eq!(MessagePrefix::Warning.format("no font"), "[WARNING] no font");
    }

    #[test]
    fn levels_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
