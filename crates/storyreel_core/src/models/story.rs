//! Story input structures (images, subtitles, narration clips).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image file extensions recognized during directory scans.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Errors raised while assembling the story input set.
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Image directory not found: {0}")]
    DirNotFound(PathBuf),

    #[error("No supported image files found in {0} (expected .jpg/.jpeg/.png/.webp)")]
    NoImages(PathBuf),

    #[error("Failed to read image directory: {0}")]
    ReadDir(#[from] std::io::Error),
}

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// A single source image with its position on the timeline.
///
/// The ordinal is the sole ordering key throughout the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Path to the image file.
    pub path: PathBuf,
    /// 0-based position on the timeline.
    pub ordinal: usize,
}

/// The validated input set for one run: ordered images, an index-aligned
/// subtitle track, and optional user-supplied narration clips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryBoard {
    /// Images in timeline order.
    pub images: Vec<ImageAsset>,
    /// Subtitle texts, index-aligned with images. May be shorter than the
    /// image list or empty; a length mismatch is a warning, not a failure.
    pub subtitles: Vec<String>,
    /// User-supplied narration clips, index-aligned with images.
    pub narration: Vec<PathBuf>,
}

impl StoryBoard {
    /// Scan an image directory and assemble the story input set.
    ///
    /// Images are sorted by file name. Narration paths that do not exist
    /// on disk are dropped with a warning. Count mismatches between
    /// subtitles/narration and images are logged but never fatal.
    pub fn scan(
        image_dir: &Path,
        subtitles: Vec<String>,
        narration: Vec<PathBuf>,
    ) -> StoryResult<Self> {
        if !image_dir.is_dir() {
            return Err(StoryError::DirNotFound(image_dir.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(image_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_supported_image(path))
            .collect();

        if paths.is_empty() {
            return Err(StoryError::NoImages(image_dir.to_path_buf()));
        }
        paths.sort();

        let images = paths
            .into_iter()
            .enumerate()
            .map(|(ordinal, path)| ImageAsset { path, ordinal })
            .collect::<Vec<_>>();

        if !subtitles.is_empty() && subtitles.len() != images.len() {
            tracing::warn!(
                "Subtitle count ({}) does not match image count ({})",
                subtitles.len(),
                images.len()
            );
        }

        let narration: Vec<PathBuf> = narration
            .into_iter()
            .filter(|path| {
                if path.exists() {
                    true
                } else {
                    tracing::warn!("Narration clip not found, skipping: {}", path.display());
                    false
                }
            })
            .collect();

        if !narration.is_empty() && narration.len() != images.len() {
            tracing::warn!(
                "Narration clip count ({}) does not match image count ({})",
                narration.len(),
                images.len()
            );
        }

        Ok(Self {
            images,
            subtitles,
            narration,
        })
    }

    /// Subtitle text for an ordinal, if present and non-blank.
    pub fn subtitle_for(&self, ordinal: usize) -> Option<&str> {
        self.subtitles
            .get(ordinal)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Whether any non-blank subtitle exists.
    pub fn has_subtitles(&self) -> bool {
        (0..self.images.len()).any(|i| self.subtitle_for(i).is_some())
    }

    /// Whether the subtitle track length disagrees with the image count.
    pub fn subtitle_count_mismatch(&self) -> bool {
        !self.subtitles.is_empty() && self.subtitles.len() != self.images.len()
    }
}

/// Check whether a path looks like a supported image file.
fn is_supported_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                IMAGE_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
}
