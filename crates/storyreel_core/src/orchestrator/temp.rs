//! Scoped temporary-artifact registry.
//!
//! Each stage registers the files it creates; the pipeline releases the
//! registry exactly once at exit, success or abort. This keeps the
//! cleanup invariant out of individual stages and away from scattered
//! existence checks.

use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

/// Accumulates temporary files for unconditional deletion at run exit.
#[derive(Debug, Default)]
pub struct TempArtifacts {
    files: Mutex<Vec<PathBuf>>,
}

impl TempArtifacts {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file for deletion at run exit.
    pub fn register(&self, path: impl Into<PathBuf>) {
        self.files.lock().push(path.into());
    }

    /// Number of currently registered files.
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }

    /// Delete every registered file and clear the registry.
    ///
    /// Files already removed by their owning stage are not an error.
    /// Returns the number of files actually deleted. Idempotent.
    pub fn release(&self) -> usize {
        let files = std::mem::take(&mut *self.files.lock());
        let mut removed = 0;
        for path in files {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Failed to remove temp file {}: {}", path.display(), e);
                }
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn release_deletes_registered_files() {
        let dir = tempdir().unwrap();
        let temp = TempArtifacts::new();

        for name in ["seg_000.mp4", "seg_001.mp4", "combined.mp4"] {
            let path = dir.path().join(name);
            fs::write(&path, b"x").unwrap();
            temp.register(&path);
        }

        assert_eq!(temp.release(), 3);
        assert!(dir.path().read_dir().unwrap().next().is_none());
    }

    #[test]
    fn release_is_idempotent() {
        let dir = tempdir().unwrap();
        let temp = TempArtifacts::new();

        let path = dir.path().join("seg_000.mp4");
        fs::write(&path, b"x").unwrap();
        temp.register(&path);

        assert_eq!(temp.release(), 1);
        assert_eq!(temp.release(), 0);
        assert!(temp.is_empty());
    }

    #[test]
    fn already_removed_files_are_tolerated() {
        let dir = tempdir().unwrap();
        let temp = TempArtifacts::new();

        // Registered but removed by its owning stage already
        temp.register(dir.path().join("narration.wav"));

        assert_eq!(temp.release(), 0);
    }
}
