//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level
//! updates.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Video defaults.
    #[serde(default)]
    pub video: VideoSettings,

    /// Narration (speech synthesis) settings.
    #[serde(default)]
    pub narration: NarrationSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// External tool overrides.
    #[serde(default)]
    pub tools: ToolSettings,
}

/// Path configuration for temp, logs, and bundled assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root folder for per-run temporary files.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Folder searched for a default background-music track.
    #[serde(default = "default_assets_folder")]
    pub assets_folder: String,
}

fn default_temp_root() -> String {
    ".storyreel/tmp".to_string()
}

fn default_logs_folder() -> String {
    ".storyreel/logs".to_string()
}

fn default_assets_folder() -> String {
    "assets".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
            assets_folder: default_assets_folder(),
        }
    }
}

/// Default video parameters used when the user supplies none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSettings {
    /// Default per-image display duration in seconds.
    #[serde(default = "default_duration")]
    pub default_duration_secs: f64,

    /// Default output frame rate.
    #[serde(default = "default_fps")]
    pub default_fps: u32,

    /// Default output file name.
    #[serde(default = "default_output_name")]
    pub default_output: String,
}

fn default_duration() -> f64 {
    3.0
}

fn default_fps() -> u32 {
    30
}

fn default_output_name() -> String {
    "story_video.mp4".to_string()
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration(),
            default_fps: default_fps(),
            default_output: default_output_name(),
        }
    }
}

/// Speech-synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationSettings {
    /// Synthesis command resolved against PATH.
    #[serde(default = "default_synth_command")]
    pub command: String,

    /// Default voice name.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Default speed multiplier.
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Per-clip synthesis timeout in seconds.
    #[serde(default = "default_synth_timeout")]
    pub timeout_secs: u64,
}

fn default_synth_command() -> String {
    "storyreel-tts".to_string()
}

fn default_voice() -> String {
    "chuichui".to_string()
}

fn default_speed() -> f64 {
    1.0
}

fn default_synth_timeout() -> u64 {
    60
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            command: default_synth_command(),
            voice: default_voice(),
            speed: default_speed(),
            timeout_secs: default_synth_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log format (tool output only kept in the tail buffer).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Show timestamps in log output.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    /// Number of tool-output lines replayed when a command fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: usize,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> usize {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            show_timestamps: true,
            error_tail: default_error_tail(),
        }
    }
}

/// External tool overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Explicit ffmpeg path; empty string means auto-discover.
    #[serde(default)]
    pub ffmpeg_path: String,
}

/// Identifies one settings section for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Video,
    Narration,
    Logging,
    Tools,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Video => "video",
            ConfigSection::Narration => "narration",
            ConfigSection::Logging => "logging",
            ConfigSection::Tools => "tools",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[narration]"));
        assert!(toml.contains("temp_root"));
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.paths.temp_root, settings.paths.temp_root);
        assert_eq!(parsed.video.default_fps, settings.video.default_fps);
        assert_eq!(parsed.narration.timeout_secs, 60);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[video]\ndefault_fps = 24";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.video.default_fps, 24);
        assert_eq!(parsed.video.default_duration_secs, 3.0);
        assert_eq!(parsed.narration.voice, "chuichui");
    }
}
