//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Step → Operation → Detail

use std::io;

use thiserror::Error;

use crate::media::MediaError;

/// Top-level pipeline error with run context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("Run '{run_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        run_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Input validation failed before the pipeline started.
    #[error("Run '{run_name}' failed validation: {message}")]
    ValidationFailed { run_name: String, message: String },

    /// Failed to set up the run (create work dir, etc.).
    #[error("Run '{run_name}' setup failed: {message}")]
    SetupFailed { run_name: String, message: String },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(
        run_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            run_name: run_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// Create a validation failed error.
    pub fn validation_failed(run_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            run_name: run_name.into(),
            message: message.into(),
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(run_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            run_name: run_name.into(),
            message: message.into(),
        }
    }
}

/// Error from a pipeline step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// An external command failed.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// An external command exceeded its deadline.
    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A required file was not found.
    #[error("Required file not found: {path}")]
    FileNotFound { path: String },

    /// Generic step error with message.
    #[error("{0}")]
    Other(String),
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create a command failed error.
    pub fn command_failed(
        tool: impl Into<String>,
        exit_code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<MediaError> for StepError {
    fn from(error: MediaError) -> Self {
        match error {
            MediaError::CommandFailed {
                tool,
                exit_code,
                message,
            } => StepError::CommandFailed {
                tool,
                exit_code,
                message,
            },
            MediaError::Timeout { tool, seconds } => StepError::Timeout { tool, seconds },
            MediaError::Io { operation, source } => StepError::IoError { operation, source },
            MediaError::MissingOutput { path } => StepError::FileNotFound {
                path: path.display().to_string(),
            },
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_displays_context() {
        let err = StepError::command_failed("ffmpeg", 1, "Invalid filter");
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Invalid filter"));
    }

    #[test]
    fn pipeline_error_chains_context() {
        let step_err = StepError::file_not_found("/tmp/seg_000.mp4");
        let pipeline_err = PipelineError::step_failed("story_xyz", "Render", step_err);

        let msg = pipeline_err.to_string();
        assert!(msg.contains("story_xyz"));
        assert!(msg.contains("Render"));
    }

    #[test]
    fn media_errors_convert() {
        let err: StepError = MediaError::Timeout {
            tool: "tts".into(),
            seconds: 60,
        }
        .into();
        assert!(matches!(err, StepError::Timeout { seconds: 60, .. }));
    }
}
