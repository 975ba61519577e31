//! Pipeline orchestrator for coordinating video runs.
//!
//! This module provides the infrastructure for running the multi-step
//! story-to-video pipeline. Each run consists of a sequence of steps
//! that validate, execute, and record their results.
//!
//! # Architecture
//!
//! ```text
//! Pipeline
//!     ├── Step: Probe
//!     ├── Step: Narrate (skippable)
//!     ├── Step: Render
//!     ├── Step: Compose
//!     └── Step: Mix
//! ```
//!
//! # Example
//!
//! ```ignore
//! use storyreel_core::orchestrator::run_story;
//!
//! let output = run_story(story, config, settings, tools, logger)?;
//! println!("Video created: {}", output.display());
//! ```

mod errors;
mod pipeline;
mod run;
mod step;
pub mod steps;
mod temp;
#[cfg(test)]
pub(crate) mod test_support;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use run::{create_standard_pipeline, run_story};
pub use step::PipelineStep;
pub use steps::{ComposeStep, MixStep, NarrateStep, ProbeStep, RenderStep};
pub use temp::TempArtifacts;
pub use types::{
    ComposeOutput, Context, MixOutput, NarrationOutput, ProbeOutput, RenderOutput, RunState,
    StepOutcome,
};
