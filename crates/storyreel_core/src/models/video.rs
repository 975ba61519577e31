//! Video configuration and derived render structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::{PanDirection, TransitionStyle};

/// Allowed range for the narration speed multiplier.
pub const NARRATION_SPEED_RANGE: (f64, f64) = (0.5, 2.0);

/// Errors raised by config validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Per-image duration must be positive, got {0}")]
    InvalidDuration(f64),

    #[error("Frame rate must be positive, got {0}")]
    InvalidFps(u32),

    #[error("Duration {duration}s at {fps} fps rounds to zero frames per image")]
    ZeroFrameSegment { duration: f64, fps: u32 },
}

/// Immutable per-run video configuration.
///
/// Built once before the pipeline starts; validated on construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Final output video path.
    pub output_path: PathBuf,
    /// Display duration of each image in seconds.
    pub per_image_duration_secs: f64,
    /// Output frame rate.
    pub fps: u32,
    /// Optional background music track.
    pub background_music: Option<PathBuf>,
    /// Pan direction (reserved).
    pub pan_direction: PanDirection,
    /// Transition style between segments.
    pub transition_style: TransitionStyle,
    /// Whether auto-narration was requested.
    pub narration_enabled: bool,
    /// Speech-synthesis voice name.
    pub narration_voice: String,
    /// Speech-synthesis speed multiplier, clamped to [0.5, 2.0].
    pub narration_speed: f64,
}

impl VideoConfig {
    /// Create a validated config.
    ///
    /// Duration and fps must be positive. Narration speed outside the
    /// allowed range is clamped with a warning.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        output_path: PathBuf,
        per_image_duration_secs: f64,
        fps: u32,
        background_music: Option<PathBuf>,
        pan_direction: PanDirection,
        transition_style: TransitionStyle,
        narration_enabled: bool,
        narration_voice: String,
        narration_speed: f64,
    ) -> Result<Self, ConfigError> {
        if per_image_duration_secs <= 0.0 || !per_image_duration_secs.is_finite() {
            return Err(ConfigError::InvalidDuration(per_image_duration_secs));
        }
        if fps == 0 {
            return Err(ConfigError::InvalidFps(fps));
        }
        // Segment frame counts must stay strictly positive
        if (fps as f64 * per_image_duration_secs).round() < 1.0 {
            return Err(ConfigError::ZeroFrameSegment {
                duration: per_image_duration_secs,
                fps,
            });
        }

        let (min, max) = NARRATION_SPEED_RANGE;
        let narration_speed = if (min..=max).contains(&narration_speed) {
            narration_speed
        } else {
            let clamped = narration_speed.clamp(min, max);
            tracing::warn!(
                "Narration speed {} outside [{}, {}], clamped to {}",
                narration_speed,
                min,
                max,
                clamped
            );
            clamped
        };

        Ok(Self {
            output_path,
            per_image_duration_secs,
            fps,
            background_music,
            pan_direction,
            transition_style,
            narration_enabled,
            narration_voice,
            narration_speed,
        })
    }

    /// Frames each segment holds: round(fps x duration).
    pub fn frames_per_image(&self) -> u64 {
        (self.fps as f64 * self.per_image_duration_secs).round() as u64
    }

    /// Total video duration in seconds for a given image count.
    pub fn video_duration_secs(&self, image_count: usize) -> f64 {
        image_count as f64 * self.per_image_duration_secs
    }
}

/// One rendered fixed-duration video clip for a single input image.
///
/// Produced by the render stage, consumed by the compose stage; the file
/// it names is a temporary artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Timeline position, matching the source image's ordinal.
    pub ordinal: usize,
    /// Path to the rendered segment file.
    pub rendered_path: PathBuf,
    /// Number of frames in this segment (strictly positive).
    pub frame_count: u64,
}
