//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::models::{RunStatus, Segment, StoryBoard, VideoConfig};
use crate::tools::FfmpegTools;

use super::temp::TempArtifacts;

/// Read-only context passed to pipeline steps.
///
/// Contains the run's inputs and shared resources that steps can read
/// but not modify. Mutable results go in `RunState`.
pub struct Context {
    /// Validated story inputs (images, subtitles, narration clips).
    pub story: StoryBoard,
    /// Per-run video configuration.
    pub config: VideoConfig,
    /// Application settings.
    pub settings: Settings,
    /// Resolved transcoding engine.
    pub tools: FfmpegTools,
    /// Subtitle font, if one was found.
    pub font: Option<PathBuf>,
    /// Run name/identifier.
    pub run_name: String,
    /// Run-specific working directory (under temp_root).
    pub work_dir: PathBuf,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
    /// Temporary-artifact registry, released once at pipeline exit.
    pub temp: Arc<TempArtifacts>,
}

impl Context {
    /// Video duration in seconds for this run's image count.
    pub fn video_duration_secs(&self) -> f64 {
        self.config.video_duration_secs(self.story.images.len())
    }
}

/// Mutable run state that accumulates results from pipeline steps.
///
/// This is the write-once manifest: steps add their own section and do
/// not overwrite earlier ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run identifier.
    pub run_id: String,
    /// Current status, terminal after the run ends.
    pub status: RunStatus,
    /// When the run started.
    pub started_at: Option<String>,
    /// Probe results (from Probe step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeOutput>,
    /// Narration results (from Narrate step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<NarrationOutput>,
    /// Segment rendering results (from Render step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderOutput>,
    /// Timeline composition results (from Compose step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose: Option<ComposeOutput>,
    /// Final mix results (from Mix step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mix: Option<MixOutput>,
}

impl RunState {
    /// Create a new run state with the given ID.
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Probed (or fallback) frame dimensions.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.probe.as_ref().map(|p| (p.width, p.height))
    }

    /// Narration clip paths, if any were recorded.
    pub fn narration_clips(&self) -> &[PathBuf] {
        self.narration
            .as_ref()
            .map(|n| n.clips.as_slice())
            .unwrap_or(&[])
    }

    /// Rendered segments in ordinal order.
    pub fn segments(&self) -> &[Segment] {
        self.render
            .as_ref()
            .map(|r| r.segments.as_slice())
            .unwrap_or(&[])
    }
}

/// Output from the Probe step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutput {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Whether the default resolution was used because probing failed.
    pub fallback: bool,
}

/// Output from the Narrate step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationOutput {
    /// Ordered narration clip paths.
    pub clips: Vec<PathBuf>,
    /// Whether the clips were synthesized (vs. user-supplied).
    pub synthesized: bool,
}

/// Output from the Render step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderOutput {
    /// One segment per image, in ordinal order.
    pub segments: Vec<Segment>,
}

/// Output from the Compose step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeOutput {
    /// Path to the silent composed video.
    pub combined_path: PathBuf,
    /// Total frame count of the composed video.
    pub total_frames: u64,
    /// Fade window used, in frames.
    pub fade_window: u64,
}

/// Output from the Mix step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixOutput {
    /// Path to the final output file.
    pub output_path: PathBuf,
    /// Which audio case was delivered (silent/music/narration/...).
    pub audio_case: String,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (preconditions not met, but not an error).
    Skipped(String),
}
