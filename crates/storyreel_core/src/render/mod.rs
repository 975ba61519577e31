//! Per-image segment rendering.
//!
//! Each source image becomes one fixed-duration video segment at the
//! probed resolution: aspect-preserving scale, centered padding, and an
//! optional burned-in subtitle. The filter expression is built separately
//! from the invocation so the string can be tested without an engine.

use std::path::{Path, PathBuf};

use crate::logging::RunLogger;
use crate::media::{run_tool, MediaError, MediaResult};
use crate::models::{ImageAsset, Segment, VideoConfig};
use crate::tools::FfmpegTools;

/// Subtitle font size as a fraction of frame height.
const SUBTITLE_SIZE_RATIO: f64 = 0.05;
/// Subtitle baseline offset from the bottom, as a fraction of height.
const SUBTITLE_BOTTOM_RATIO: f64 = 0.15;

/// Build the per-segment video filter expression.
///
/// Always: fps conversion, aspect-preserving scale into WxH, centered pad.
/// Plus `drawtext` when a non-empty subtitle and a font are both present:
/// white text, black shadow, bottom-centered.
pub fn build_video_filter(
    width: u32,
    height: u32,
    fps: u32,
    subtitle: Option<&str>,
    font: Option<&Path>,
) -> String {
    let mut vf = format!(
        "fps={fps},scale={width}:{height}:force_original_aspect_ratio=decrease,\
         pad={width}:{height}:(ow-iw)/2:(oh-ih)/2"
    );

    if let (Some(text), Some(font)) = (subtitle.filter(|t| !t.is_empty()), font) {
        let fontsize = (height as f64 * SUBTITLE_SIZE_RATIO) as u32;
        let bottom = (height as f64 * SUBTITLE_BOTTOM_RATIO) as u32;
        vf.push_str(&format!(
            ",drawtext=text='{}':fontfile='{}':fontcolor=white:fontsize={}:\
             x=(w-tw)/2:y=h-{}:shadowcolor=black:shadowx=2:shadowy=2",
            escape_drawtext(text),
            font.display(),
            fontsize,
            bottom
        ));
    }

    vf
}

/// Escape characters that break drawtext option parsing.
pub fn escape_drawtext(text: &str) -> String {
    text.replace(':', "\\:").replace('\'', "\\'")
}

/// Render one image into a fixed-duration segment file.
///
/// The segment is written to `output_path`; ownership of the file passes
/// to the caller (it must be registered as a temporary artifact). Engine
/// failure is fatal for the whole run.
#[allow(clippy::too_many_arguments)]
pub fn render_segment(
    logger: &RunLogger,
    tools: &FfmpegTools,
    image: &ImageAsset,
    config: &VideoConfig,
    dimensions: (u32, u32),
    subtitle: Option<&str>,
    font: Option<&Path>,
    output_path: &Path,
) -> MediaResult<Segment> {
    let (width, height) = dimensions;
    let vf = build_video_filter(width, height, config.fps, subtitle, font);

    let args = vec![
        "-y".to_string(),
        "-loop".to_string(),
        "1".to_string(),
        "-i".to_string(),
        image.path.display().to_string(),
        "-t".to_string(),
        config.per_image_duration_secs.to_string(),
        "-vf".to_string(),
        vf,
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "medium".to_string(),
        "-crf".to_string(),
        "23".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        output_path.display().to_string(),
    ];

    run_tool(logger, "ffmpeg", &tools.ffmpeg, &args)?;

    if !output_path.exists() {
        return Err(MediaError::MissingOutput {
            path: output_path.to_path_buf(),
        });
    }

    Ok(Segment {
        ordinal: image.ordinal,
        rendered_path: output_path.to_path_buf(),
        frame_count: config.frames_per_image(),
    })
}

/// File name for the temporary segment of a given ordinal.
pub fn segment_file_name(ordinal: usize) -> PathBuf {
    PathBuf::from(format!("seg_{:03}.mp4", ordinal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_without_subtitle_scales_and_pads() {
        let vf = build_video_filter(1920, 1080, 30, None, None);
        assert!(vf.starts_with("fps=30,scale=1920:1080:force_original_aspect_ratio=decrease"));
        assert!(vf.contains("pad=1920:1080:(ow-iw)/2:(oh-ih)/2"));
        assert!(!vf.contains("drawtext"));
    }

    #[test]
    fn filter_with_subtitle_draws_text() {
        let font = PathBuf::from("/usr/share/fonts/truetype/wqy/wqy-microhei.ttc");
        let vf = build_video_filter(1920, 1080, 30, Some("hello world"), Some(&font));
        assert!(vf.contains("drawtext=text='hello world'"));
        // 5% of 1080 and 15% offset from the bottom
        assert!(vf.contains("fontsize=54"));
        assert!(vf.contains("y=h-162"));
        assert!(vf.contains("shadowcolor=black:shadowx=2:shadowy=2"));
    }

    #[test]
    fn subtitle_without_font_is_skipped() {
        let vf = build_video_filter(1920, 1080, 30, Some("hello"), None);
        assert!(!vf.contains("drawtext"));
    }

    #[test]
    fn empty_subtitle_is_skipped() {
        let font = PathBuf::from("/tmp/font.ttf");
        let vf = build_video_filter(1920, 1080, 30, Some(""), Some(&font));
        assert!(!vf.contains("drawtext"));
    }

    #[test]
    fn drawtext_escaping() {
        assert_eq!(escape_drawtext("a:b"), "a\\:b");
        assert_eq!(escape_drawtext("it's"), "it\\'s");
        assert_eq!(escape_drawtext("plain"), "plain");
    }

    #[test]
    fn segment_file_names_are_zero_padded() {
        assert_eq!(segment_file_name(0), PathBuf::from("seg_000.mp4"));
        assert_eq!(segment_file_name(42), PathBuf::from("seg_042.mp4"));
    }
}
