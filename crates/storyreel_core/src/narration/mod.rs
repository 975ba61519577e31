//! Narration synthesis via an external speech-synthesis command.
//!
//! One clip is produced per non-empty subtitle, in order. The batch is
//! all-or-nothing: any individual failure (non-zero exit, timeout,
//! missing output file) abandons the whole batch and removes the clips
//! already produced. The caller then proceeds without narration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging::RunLogger;
use crate::media::{run_tool_with_timeout, MediaError, MediaResult};

/// Synthesize one clip per non-empty subtitle.
///
/// Invocation per clip: `command TEXT OUT_PATH VOICE SPEED`, bounded by
/// `timeout`. Clips are named `narration_NNN.wav` (1-based subtitle
/// position, zero-padded) under `out_dir`. Returns the ordered clip paths
/// on success.
pub fn synthesize_batch(
    logger: &RunLogger,
    command: &Path,
    subtitles: &[String],
    voice: &str,
    speed: f64,
    timeout: Duration,
    out_dir: &Path,
) -> MediaResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| MediaError::io("creating narration dir", e))?;

    let mut clips: Vec<PathBuf> = Vec::new();

    for (i, subtitle) in subtitles.iter().enumerate() {
        let text = subtitle.trim();
        if text.is_empty() {
            continue;
        }

        let clip_path = out_dir.join(format!("narration_{:03}.wav", i + 1));
        let args = vec![
            text.to_string(),
            clip_path.display().to_string(),
            voice.to_string(),
            speed.to_string(),
        ];

        let result = run_tool_with_timeout(logger, "tts", command, &args, timeout);

        let failure = match result {
            Ok(_) if clip_path.exists() => None,
            Ok(_) => Some(MediaError::MissingOutput {
                path: clip_path.clone(),
            }),
            Err(e) => Some(e),
        };

        if let Some(error) = failure {
            logger.warn(&format!(
                "Synthesis failed for subtitle {} ({}), abandoning narration",
                i + 1,
                preview(text)
            ));
            abandon_clips(&clips);
            return Err(error);
        }

        clips.push(clip_path);
    }

    logger.success(&format!("Synthesized {} narration clips", clips.len()));
    Ok(clips)
}

/// Remove clips produced before the batch was abandoned.
fn abandon_clips(clips: &[PathBuf]) {
    for clip in clips {
        let _ = fs::remove_file(clip);
    }
}

/// Shorten subtitle text for log lines.
fn preview(text: &str) -> String {
    const MAX: usize = 30;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogConfig, RunLogger};
    use tempfile::tempdir;

    fn logger(dir: &Path) -> RunLogger {
        RunLogger::new("narration_test", dir, LogConfig::default()).unwrap()
    }

    /// A stand-in synthesis script: writes its second argument unless the
    /// text contains "FAIL".
    fn fake_synth(dir: &Path) -> PathBuf {
        let script = dir.join("fake-tts.sh");
        fs::write(
            &script,
            "#!/bin/sh\ncase \"$1\" in *FAIL*) exit 1;; esac\necho audio > \"$2\"\n",
        )
        .unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        }
        script
    }

    #[test]
    fn skips_blank_subtitles_and_keeps_positional_names() {
        let dir = tempdir().unwrap();
        let logger = logger(dir.path());
        let script = fake_synth(dir.path());
        let out_dir = dir.path().join("clips");

        let subtitles = vec!["one".to_string(), "  ".to_string(), "three".to_string()];
        let clips = synthesize_batch(
            &logger,
            &script,
            &subtitles,
            "chuichui",
            1.0,
            Duration::from_secs(5),
            &out_dir,
        )
        .unwrap();

        assert_eq!(clips.len(), 2);
        assert!(clips[0].ends_with("narration_001.wav"));
        assert!(clips[1].ends_with("narration_003.wav"));
        assert!(clips.iter().all(|clip| clip.exists()));
    }

    #[test]
    fn any_failure_abandons_the_batch() {
        let dir = tempdir().unwrap();
        let logger = logger(dir.path());
        let script = fake_synth(dir.path());
        let out_dir = dir.path().join("clips");

        let subtitles = vec!["one".to_string(), "FAIL two".to_string()];
        let err = synthesize_batch(
            &logger,
            &script,
            &subtitles,
            "chuichui",
            1.0,
            Duration::from_secs(5),
            &out_dir,
        )
        .unwrap_err();

        assert!(matches!(err, MediaError::CommandFailed { .. }));
        // The first clip was produced, then removed with the batch
        assert!(!out_dir.join("narration_001.wav").exists());
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "x".repeat(50);
        assert_eq!(preview(&long).chars().count(), 33);
        assert_eq!(preview("short"), "short");
    }
}
