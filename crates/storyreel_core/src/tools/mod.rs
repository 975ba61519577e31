//! External tool discovery.
//!
//! Locates the transcoding engine (ffmpeg/ffprobe), a subtitle-capable
//! system font, and the optional speech-synthesis command. The engine is
//! required and must support the `drawtext` filter; everything else
//! degrades gracefully.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// ffmpeg candidates, tried in order. The ffmpeg-full homebrew build is
/// preferred because the default bottle may lack drawtext.
const FFMPEG_CANDIDATES: &[&str] = &[
    "/opt/homebrew/opt/ffmpeg-full/bin/ffmpeg",
    "ffmpeg",
    "/opt/homebrew/bin/ffmpeg",
    "/usr/local/bin/ffmpeg",
];

/// System fonts with CJK coverage, tried in order.
const FONT_CANDIDATES: &[&str] = &[
    // macOS
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    // Linux
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/arphic/uming.ttc",
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
];

/// Errors raised during required-tool discovery.
#[derive(Error, Debug)]
pub enum ToolsError {
    #[error(
        "ffmpeg with drawtext support not found. Install it first:\n\
         \x20 macOS:   brew install ffmpeg\n\
         \x20 Ubuntu:  sudo apt install ffmpeg\n\
         \x20 Windows: download from ffmpeg.org"
    )]
    FfmpegNotFound,
}

/// Resolved transcoding engine paths.
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    /// Path or command name for ffmpeg.
    pub ffmpeg: PathBuf,
    /// Path or command name for ffprobe, derived from the ffmpeg location.
    pub ffprobe: PathBuf,
}

impl FfmpegTools {
    /// Locate a drawtext-capable ffmpeg.
    ///
    /// Tries the override first (if non-empty), then the fixed candidate
    /// list. A candidate qualifies only if `ffmpeg -filters` runs
    /// successfully and lists `drawtext`.
    pub fn locate(override_path: Option<&Path>) -> Result<Self, ToolsError> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = override_path {
            if !path.as_os_str().is_empty() {
                candidates.push(path.to_path_buf());
            }
        }
        candidates.extend(FFMPEG_CANDIDATES.iter().map(PathBuf::from));

        for candidate in candidates {
            if supports_drawtext(&candidate) {
                let ffprobe = derive_ffprobe(&candidate);
                tracing::debug!(
                    "Using ffmpeg: {} (ffprobe: {})",
                    candidate.display(),
                    ffprobe.display()
                );
                return Ok(Self {
                    ffmpeg: candidate,
                    ffprobe,
                });
            }
        }

        Err(ToolsError::FfmpegNotFound)
    }
}

/// Check whether a candidate ffmpeg runs and supports drawtext.
fn supports_drawtext(candidate: &Path) -> bool {
    let output = match Command::new(candidate).arg("-filters").output() {
        Ok(output) => output,
        Err(_) => return false,
    };
    output.status.success() && String::from_utf8_lossy(&output.stdout).contains("drawtext")
}

/// Derive the ffprobe path from the chosen ffmpeg path.
///
/// An absolute ffmpeg path has ffprobe as a sibling binary; a bare command
/// name resolves ffprobe from PATH too.
fn derive_ffprobe(ffmpeg: &Path) -> PathBuf {
    match ffmpeg.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join("ffprobe"),
        _ => PathBuf::from("ffprobe"),
    }
}

/// Find a subtitle-capable system font.
///
/// Returns `None` when no candidate exists; subtitle burn-in then degrades
/// to no overlay.
pub fn find_subtitle_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Resolve the speech-synthesis command.
///
/// A name containing a path separator is checked directly; otherwise it is
/// resolved against PATH. `None` disables auto-narration.
pub fn find_synth_command(command: &str) -> Option<PathBuf> {
    if command.is_empty() {
        return None;
    }
    let as_path = Path::new(command);
    if as_path.components().count() > 1 {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }
    find_in_path(command)
}

/// Search PATH for an executable.
pub fn find_in_path(tool: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let full = dir.join(tool);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{tool}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}
