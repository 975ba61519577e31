//! Audio concatenation, mixing, and the final mux.
//!
//! Four delivery cases, decided by which audio sources exist:
//! - neither: the silent composed video is renamed to the final output
//! - music only: music padded to video length, attenuated, sole track
//! - narration only: clips concatenated, sole track, no stretching
//! - both: amix with narration governing duration
//!
//! The mux always copies the video stream untouched and encodes only the
//! audio. The filter expressions are pure builders so they can be tested
//! without an engine.

use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::RunLogger;
use crate::media::{run_tool, MediaError, MediaResult};
use crate::tools::FfmpegTools;

/// Background music volume relative to full scale.
pub const MUSIC_VOLUME: f64 = 0.3;

/// Audio sources available for the final mux.
#[derive(Debug, Clone, Default)]
pub struct AudioPlan {
    /// Concatenated narration track, if any.
    pub narration: Option<PathBuf>,
    /// Background music track, if any.
    pub music: Option<PathBuf>,
}

impl AudioPlan {
    /// Short case name for logging and the run manifest.
    pub fn case_name(&self) -> &'static str {
        match (&self.narration, &self.music) {
            (Some(_), Some(_)) => "narration+music",
            (Some(_), None) => "narration",
            (None, Some(_)) => "music",
            (None, None) => "silent",
        }
    }
}

/// Build the audio filter_complex for the final mux.
///
/// Input 0 is the composed video; narration (when present) is input 1 and
/// music takes the next slot. Returns `None` when there is no audio.
pub fn build_audio_filter(
    has_narration: bool,
    has_music: bool,
    video_duration_secs: f64,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if has_narration {
        parts.push("[1:a]atempo=1.0[voice]".to_string());
    }
    if has_music {
        let music_index = if has_narration { 2 } else { 1 };
        parts.push(format!(
            "[{}:a]apad=whole_dur={}s,volume={}[bgm]",
            music_index, video_duration_secs, MUSIC_VOLUME
        ));
    }

    let terminal = match (has_narration, has_music) {
        // Narration governs the mixed duration
        (true, true) => "[voice][bgm]amix=inputs=2:duration=first:dropout_transition=2[audioout]",
        (true, false) => "[voice]acopy[audioout]",
        (false, true) => "[bgm]acopy[audioout]",
        (false, false) => return None,
    };
    parts.push(terminal.to_string());

    Some(parts.join(";"))
}

/// Concatenate narration clips into one track via the concat protocol.
///
/// Clips must share a format (the synthesizer produces uniform WAV), so
/// stream copy is safe.
pub fn concat_narration(
    logger: &RunLogger,
    tools: &FfmpegTools,
    clips: &[PathBuf],
    output_path: &Path,
) -> MediaResult<()> {
    let joined = clips
        .iter()
        .map(|clip| clip.display().to_string())
        .collect::<Vec<_>>()
        .join("|");

    let args = vec![
        "-y".to_string(),
        "-i".to_string(),
        format!("concat:{}", joined),
        "-c".to_string(),
        "copy".to_string(),
        output_path.display().to_string(),
    ];

    run_tool(logger, "ffmpeg", &tools.ffmpeg, &args)?;

    if !output_path.exists() {
        return Err(MediaError::MissingOutput {
            path: output_path.to_path_buf(),
        });
    }

    Ok(())
}

/// Mux audio onto the composed video, writing the final output.
///
/// The video stream is mapped with `-c:v copy`; audio is encoded as AAC.
/// `-shortest` trims the container to the shorter of video and mixed
/// audio. The caller builds `filter` via [`build_audio_filter`] and
/// takes the rename path instead when it yields no audio.
pub fn mux_output(
    logger: &RunLogger,
    tools: &FfmpegTools,
    combined_video: &Path,
    plan: &AudioPlan,
    filter: &str,
    output_path: &Path,
) -> MediaResult<()> {
    let mut args = vec![
        "-y".to_string(),
        "-i".to_string(),
        combined_video.display().to_string(),
    ];
    if let Some(ref narration) = plan.narration {
        args.push("-i".to_string());
        args.push(narration.display().to_string());
    }
    if let Some(ref music) = plan.music {
        args.push("-i".to_string());
        args.push(music.display().to_string());
    }
    args.extend([
        "-filter_complex".to_string(),
        filter.to_string(),
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        "[audioout]".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-shortest".to_string(),
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

/// Deliver the silent composed video as the final output (no audio case).
///
/// Rename where possible; falls back to copy+remove when the output lives
/// on a different filesystem than the work dir.
pub fn deliver_video_only(combined_video: &Path, output_path: &Path) -> MediaResult<()> {
    if fs::rename(combined_video, output_path).is_ok() {
        return Ok(());
    }

    fs::copy(combined_video, output_path)
        .map_err(|e| MediaError::io("copying composed video", e))?;
    fs::remove_file(combined_video)
        .map_err(|e| MediaError::io("removing composed video", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn no_audio_yields_no_filter() {
        assert_eq!(build_audio_filter(false, false, 9.0), None);
    }

    #[test]
    fn music_only_pads_and_attenuates() {
        let filter = build_audio_filter(false, true, 9.0).unwrap();
        assert_eq!(
            filter,
            "[1:a]apad=whole_dur=9s,volume=0.3[bgm];[bgm]acopy[audioout]"
        );
    }

    #[test]
    fn narration_only_is_not_stretched() {
        let filter = build_audio_filter(true, false, 9.0).unwrap();
        assert_eq!(filter, "[1:a]atempo=1.0[voice];[voice]acopy[audioout]");
        assert!(!filter.contains("apad"));
    }

    #[test]
    fn both_mixes_with_narration_governing_duration() {
        let filter = build_audio_filter(true, true, 6.0).unwrap();
        assert!(filter.starts_with("[1:a]atempo=1.0[voice];"));
        assert!(filter.contains("[2:a]apad=whole_dur=6s,volume=0.3[bgm]"));
        assert!(filter
            .ends_with("[voice][bgm]amix=inputs=2:duration=first:dropout_transition=2[audioout]"));
    }

    #[test]
    fn music_index_shifts_with_narration() {
        let without = build_audio_filter(false, true, 3.0).unwrap();
        let with = build_audio_filter(true, true, 3.0).unwrap();
        assert!(without.contains("[1:a]apad"));
        assert!(with.contains("[2:a]apad"));
    }

    #[test]
    fn plan_case_names() {
        let plan = AudioPlan::default();
        assert_eq!(plan.case_name(), "silent");

        let plan = AudioPlan {
            narration: Some(PathBuf::from("n.wav")),
            music: Some(PathBuf::from("m.mp3")),
        };
        assert_eq!(plan.case_name(), "narration+music");
    }

    #[test]
    fn video_only_delivery_renames() {
        let dir = tempdir().unwrap();
        let combined = dir.path().join("combined.mp4");
        let output = dir.path().join("story.mp4");
        fs::write(&combined, b"video").unwrap();

        deliver_video_only(&combined, &output).unwrap();

        assert!(!combined.exists());
        assert_eq!(fs::read(&output).unwrap(), b"video");
    }
}
