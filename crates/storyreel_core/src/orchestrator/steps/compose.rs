//! Compose step - joins the rendered segments into one silent video.
//!
//! Builds the transition timeline (fade placement per segment position)
//! and runs a single filter_complex concat. The combined file is a
//! temporary; audio is attached by the Mix step.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{ComposeOutput, Context, RunState, StepOutcome};
use crate::timeline::{compose, Timeline};

/// File name of the combined silent video inside the work dir.
const COMBINED_FILE: &str = "combined.mp4";

/// Compose step for stitching segments into the full timeline.
pub struct ComposeStep;

impl ComposeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ComposeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ComposeStep {
    fn name(&self) -> &str {
        "Compose"
    }

    fn description(&self) -> &str {
        "Join rendered segments with transitions"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let segments = state.segments();
        if segments.is_empty() {
            return Err(StepError::invalid_input("No rendered segments to compose"));
        }

        let timeline = Timeline::build(
            segments.to_vec(),
            ctx.config.fps,
            ctx.config.transition_style,
        );
        ctx.logger.info(&format!(
            "Composing {} segment(s), {} frames total, fade window {} frame(s)",
            timeline.segments.len(),
            timeline.total_frames(),
            timeline.fade_window
        ));

        let combined_path = ctx.work_dir.join(COMBINED_FILE);
        compose(&ctx.logger, &ctx.tools, &timeline, &combined_path)?;
        ctx.temp.register(&combined_path);

        state.compose = Some(ComposeOutput {
            combined_path,
            total_frames: timeline.total_frames(),
            fade_window: timeline.fade_window,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match state.compose {
            Some(ref c) if c.combined_path.exists() => Ok(()),
            Some(ref c) => Err(StepError::invalid_output(format!(
                "Combined video missing: {}",
                c.combined_path.display()
            ))),
            None => Err(StepError::invalid_output("No compose output recorded")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::test_support::test_context;

    #[test]
    fn compose_step_has_correct_name() {
        let step = ComposeStep::new();
        assert_eq!(step.name(), "Compose");
    }

    #[test]
    fn execute_requires_segments() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let step = ComposeStep::new();
        let mut state = RunState::new("test");
        let err = step.execute(&ctx, &mut state).unwrap_err();
        assert!(err.to_string().contains("No rendered segments"));
    }
}
