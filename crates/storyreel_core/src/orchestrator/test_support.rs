//! Shared helpers for orchestrator tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::logging::{LogConfig, RunLogger};
use crate::models::{ImageAsset, PanDirection, StoryBoard, TransitionStyle, VideoConfig};
use crate::tools::FfmpegTools;

use super::temp::TempArtifacts;
use super::types::Context;

/// Build a minimal context rooted at `dir` for exercising the pipeline.
///
/// The ffmpeg paths are placeholders; tests using this context must not
/// spawn the tools.
pub fn test_context(dir: &Path) -> Context {
    let logger = RunLogger::new("test", dir.join("logs"), LogConfig::default())
        .expect("test logger");

    let story = StoryBoard {
        images: vec![
            ImageAsset {
                path: dir.join("001.jpg"),
                ordinal: 0,
            },
            ImageAsset {
                path: dir.join("002.jpg"),
                ordinal: 1,
            },
        ],
        subtitles: Vec::new(),
        narration: Vec::new(),
    };

    let config = VideoConfig::new(
        dir.join("out.mp4"),
        2.0,
        10,
        None,
        PanDirection::Left,
        TransitionStyle::Fade,
        false,
        "chuichui".to_string(),
        1.0,
    )
    .expect("test config");

    Context {
        story,
        config,
        settings: Settings::default(),
        tools: FfmpegTools {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        },
        font: None,
        run_name: "test".to_string(),
        work_dir: dir.to_path_buf(),
        logger: Arc::new(logger),
        temp: Arc::new(TempArtifacts::new()),
    }
}
