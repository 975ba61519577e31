//! Probe step - determines the output frame dimensions.
//!
//! Probes the first image with ffprobe. When probing fails the run
//! continues with the 1920x1080 default rather than aborting; every
//! image is scaled and padded to the chosen dimensions later anyway.

use crate::media::probe_dimensions;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ProbeOutput, RunState, StepOutcome};

/// Default dimensions when probing the first image fails.
pub const DEFAULT_DIMENSIONS: (u32, u32) = (1920, 1080);

/// Probe step for resolving the output resolution.
pub struct ProbeStep;

impl ProbeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProbeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ProbeStep {
    fn name(&self) -> &str {
        "Probe"
    }

    fn description(&self) -> &str {
        "Determine output frame dimensions from the first image"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.story.images.is_empty() {
            return Err(StepError::invalid_input("No images to probe"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let first = &ctx.story.images[0];
        ctx.logger
            .info(&format!("Probing dimensions of {}", first.path.display()));

        let output = match probe_dimensions(&ctx.tools, &first.path) {
            Some((width, height)) => {
                ctx.logger
                    .info(&format!("Output resolution: {}x{}", width, height));
                ProbeOutput {
                    width,
                    height,
                    fallback: false,
                }
            }
            None => {
                let (width, height) = DEFAULT_DIMENSIONS;
                ctx.logger.warn(&format!(
                    "Could not probe image dimensions, using default {}x{}",
                    width, height
                ));
                ProbeOutput {
                    width,
                    height,
                    fallback: true,
                }
            }
        };

        state.probe = Some(output);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match state.probe {
            Some(ref p) if p.width > 0 && p.height > 0 => Ok(()),
            Some(_) => Err(StepError::invalid_output("Probed dimensions are zero")),
            None => Err(StepError::invalid_output("No probe output recorded")),
        }
    }
}
