//! Image dimension probing via ffprobe.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::tools::FfmpegTools;

/// Probe a source image for its pixel dimensions.
///
/// Runs `ffprobe ... -show_entries stream=width,height -of csv=s=x:p=0`.
/// Every failure mode (spawn error, non-zero exit, unparsable output)
/// returns `None`; the caller falls back to a default resolution. This is
/// a recoverable degradation, never fatal.
pub fn probe_dimensions(tools: &FfmpegTools, image: &Path) -> Option<(u32, u32)> {
    let output = Command::new(&tools.ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=s=x:p=0",
        ])
        .arg(image)
        .stdin(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        tracing::debug!(
            "ffprobe exited with {:?} for {}",
            output.status.code(),
            image.display()
        );
        return None;
    }

    parse_dimensions(&String::from_utf8_lossy(&output.stdout))
}

/// Parse "WxH" probe output.
fn parse_dimensions(raw: &str) -> Option<(u32, u32)> {
    let mut parts = raw.trim().split('x');
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    if parts.next().is_some() || width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}
