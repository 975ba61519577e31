//! Timeline composition: fade placement and filter-graph assembly.
//!
//! Fade placement is a pure function of (segment position, total count),
//! kept separate from graph-string assembly so the decision logic can be
//! tested on its own. The composed graph concatenates all segments,
//! video-only, in ordinal order into one silent stream.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logging::RunLogger;
use crate::media::{run_tool, MediaError, MediaResult};
use crate::models::{Segment, TransitionStyle};
use crate::tools::FfmpegTools;

/// Fixed fade duration at each transition boundary, in seconds.
pub const FADE_SECONDS: f64 = 1.0;

/// Fade window length in frames for a given frame rate.
pub fn fade_window_frames(fps: u32) -> u64 {
    (fps as f64 * FADE_SECONDS).round() as u64
}

/// Which fades a segment receives, determined by its timeline position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePlacement {
    /// Lone segment: no fades at all.
    NoFade,
    /// First of several: fade out at the tail only.
    FadeOutOnly,
    /// Last of several: fade in at the head only.
    FadeInOnly,
    /// Interior segment: both.
    Both,
}

impl FadePlacement {
    /// Placement for the segment at `index` of `total`.
    pub fn for_position(index: usize, total: usize) -> Self {
        if total <= 1 {
            FadePlacement::NoFade
        } else if index == 0 {
            FadePlacement::FadeOutOnly
        } else if index == total - 1 {
            FadePlacement::FadeInOnly
        } else {
            FadePlacement::Both
        }
    }
}

/// The composed timeline: ordered segments plus the fade window and the
/// filter-graph expression that concatenates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    /// Segments in ordinal order.
    pub segments: Vec<Segment>,
    /// Fade window in frames.
    pub fade_window: u64,
    /// Complete filter_complex expression.
    pub filter_graph: String,
}

impl Timeline {
    /// Build the timeline for a set of rendered segments.
    ///
    /// Segments must already be in ordinal order; the graph preserves that
    /// order regardless of how they were produced.
    pub fn build(segments: Vec<Segment>, fps: u32, style: TransitionStyle) -> Self {
        let fade_window = fade_window_frames(fps);
        let filter_graph = build_filter_graph(&segments, fade_window, style);
        Self {
            segments,
            fade_window,
            filter_graph,
        }
    }

    /// Total frame count of the composed video.
    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| s.frame_count).sum()
    }
}

/// Assemble the filter_complex expression for the given segments.
///
/// With `Fade`, each input gets a fade chain per its placement; short
/// segments whose fade windows overlap are composed as-is (the engine's
/// fade semantics stay well-defined under overlap). With `Concat`, inputs
/// feed the concat filter directly.
pub fn build_filter_graph(segments: &[Segment], fade_window: u64, style: TransitionStyle) -> String {
    let total = segments.len();
    let mut parts: Vec<String> = Vec::new();

    let concat_inputs: String = match style {
        TransitionStyle::Fade => {
            for (i, segment) in segments.iter().enumerate() {
                let placement = FadePlacement::for_position(i, total);
                parts.push(fade_chain(i, placement, segment.frame_count, fade_window));
            }
            (0..total).map(|i| format!("[v{}]", i)).collect()
        }
        TransitionStyle::Concat => (0..total).map(|i| format!("[{}:v]", i)).collect(),
    };

    parts.push(format!(
        "{}concat=n={}:v=1:a=0[outv]",
        concat_inputs, total
    ));

    parts.join(";")
}

/// Fade chain for one input stream.
fn fade_chain(input: usize, placement: FadePlacement, frame_count: u64, window: u64) -> String {
    let out_start = frame_count.saturating_sub(window);
    match placement {
        FadePlacement::NoFade => format!("[{input}:v]null[v{input}]"),
        FadePlacement::FadeOutOnly => format!(
            "[{input}:v]fade=t=out:st={out_start}:d={window}:alpha=1[v{input}]"
        ),
        FadePlacement::FadeInOnly => format!(
            "[{input}:v]fade=t=in:st=0:d={window}:alpha=1[v{input}]"
        ),
        FadePlacement::Both => format!(
            "[{input}:v]fade=t=in:st=0:d={window}:alpha=1,\
             fade=t=out:st={out_start}:d={window}:alpha=1[v{input}]"
        ),
    }
}

/// Compose all segments into one silent video file.
///
/// Every segment file is an input; the graph output is mapped as the sole
/// video stream. Failure is fatal for the run.
pub fn compose(
    logger: &RunLogger,
    tools: &FfmpegTools,
    timeline: &Timeline,
    output_path: &Path,
) -> MediaResult<()> {
    let mut args = vec!["-y".to_string()];
    for segment in &timeline.segments {
        args.push("-i".to_string());
        args.push(segment.rendered_path.display().to_string());
    }
    args.extend([
        "-filter_complex".to_string(),
        timeline.filter_graph.clone(),
        "-map".to_string(),
        "[outv]".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "medium".to_string(),
        "-crf".to_string(),
        "23".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        output_path.display().to_string(),
    ]);

    run_tool(logger, "ffmpeg", &tools.ffmpeg, &args)?;

    if !output_path.exists() {
        return Err(MediaError::MissingOutput {
            path: output_path.to_path_buf(),
        });
    }

    Ok(())
}
