//! Data models for Storyreel.
//!
//! This module contains all core data structures used throughout the
//! pipeline:
//! - Enums for pan direction, transition style, and run status
//! - Story structures (image assets, subtitle track, narration)
//! - Video structures (config, segments, timeline)

mod enums;
mod story;
mod video;

pub use enums::{PanDirection, RunStatus, TransitionStyle};
pub use story::{ImageAsset, StoryBoard, StoryError, StoryResult};
pub use video::{ConfigError, Segment, VideoConfig};
