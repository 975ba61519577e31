//! External-engine invocation: command runner and media probing.
//!
//! All out-of-process ffmpeg/ffprobe/synthesis calls go through this
//! module. Invocations are blocking and attempted exactly once; there are
//! no retries anywhere in the pipeline.

mod probe;
mod runner;

pub use probe::probe_dimensions;
pub use runner::{run_tool, run_tool_with_timeout, CommandOutput};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from external-engine invocations.
#[derive(Error, Debug)]
pub enum MediaError {
    /// The tool ran and returned a failure exit code.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The tool exceeded its deadline and was killed.
    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    /// The process could not be spawned or its output read.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// The tool exited successfully but the expected file is missing.
    #[error("Expected output file missing: {path}")]
    MissingOutput { path: PathBuf },
}

impl MediaError {
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for external-engine invocations.
pub type MediaResult<T> = Result<T, MediaError>;
