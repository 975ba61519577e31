//! Storyreel Core - story-video compositing backend
//!
//! This crate contains all pipeline logic with zero CLI dependencies.
//! It turns an ordered set of still images plus optional per-image
//! subtitles and narration audio into a single rendered video with
//! cross-fade transitions, burned-in subtitles, and mixed
//! background-music/narration audio.
//!
//! External collaborators are ffmpeg/ffprobe (transcoding engine) and an
//! optional speech-synthesis command (narration).

pub mod audio;
pub mod config;
pub mod logging;
pub mod media;
pub mod models;
pub mod narration;
pub mod orchestrator;
pub mod render;
pub mod timeline;
pub mod tools;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
