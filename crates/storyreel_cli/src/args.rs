//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Turn an image sequence into a narrated story video.
#[derive(Parser, Debug)]
#[command(name = "storyreel", version, about)]
pub struct Args {
    /// Directory containing the story images (jpg/jpeg/png/webp).
    pub image_dir: Option<PathBuf>,

    /// Subtitle text, one per image in order (repeatable).
    #[arg(long = "subtitle")]
    pub subtitles: Vec<String>,

    /// Narration audio clip, one per image in order (repeatable).
    #[arg(long = "narration")]
    pub narration: Vec<PathBuf>,

    /// Synthesize narration from subtitles when no clips are given.
    #[arg(long)]
    pub auto_narration: bool,

    /// Voice name for narration synthesis.
    #[arg(long)]
    pub narration_voice: Option<String>,

    /// Speed multiplier for narration synthesis (0.5 to 2.0).
    #[arg(long)]
    pub narration_speed: Option<f64>,

    /// Output video path.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Seconds each image is shown.
    #[arg(long)]
    pub duration: Option<f64>,

    /// Output frame rate.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Background music file.
    #[arg(long)]
    pub bgm: Option<PathBuf>,

    /// Configuration file path.
    #[arg(long, default_value = "storyreel.toml")]
    pub config: PathBuf,

    /// Verbose logging.
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// Whether any video option beyond the image directory was given.
    ///
    /// When none were, and stdin is a terminal, the missing values are
    /// collected interactively instead of silently defaulted.
    pub fn has_video_options(&self) -> bool {
        self.output.is_some()
            || self.duration.is_some()
            || self.fps.is_some()
            || self.bgm.is_some()
            || self.auto_narration
            || self.narration_voice.is_some()
            || self.narration_speed.is_some()
    }
}
