//! Render step - encodes one still-image segment per storyboard image.
//!
//! Each segment is a short H.264 clip at the probed resolution with the
//! image scaled and padded to fit, plus a burned-in subtitle when both
//! text and a font are available. Segment files are temporaries under
//! the work dir; any encoder failure aborts the run.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RenderOutput, RunState, StepOutcome};
use crate::render::{render_segment, segment_file_name};

/// Render step for per-image segment encoding.
pub struct RenderStep;

impl RenderStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RenderStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for RenderStep {
    fn name(&self) -> &str {
        "Render"
    }

    fn description(&self) -> &str {
        "Render one video segment per image"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.story.images.is_empty() {
            return Err(StepError::invalid_input("No images to render"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let dimensions = state
            .dimensions()
            .ok_or_else(|| StepError::invalid_input("Dimensions not probed"))?;

        if ctx.story.subtitle_count_mismatch() {
            ctx.logger.warn(&format!(
                "{} subtitle(s) for {} image(s); extra positions get no text",
                ctx.story.subtitles.len(),
                ctx.story.images.len()
            ));
        }
        if ctx.story.has_subtitles() && ctx.font.is_none() {
            ctx.logger
                .warn("No subtitle font found; subtitles will not be drawn");
        }

        let total = ctx.story.images.len();
        let mut output = RenderOutput::default();

        for image in &ctx.story.images {
            let subtitle = ctx.story.subtitle_for(image.ordinal);
            ctx.logger.info(&format!(
                "Rendering segment {}/{}{}",
                image.ordinal + 1,
                total,
                if subtitle.is_some() { " (subtitled)" } else { "" }
            ));

            let seg_path = ctx.work_dir.join(segment_file_name(image.ordinal));
            let segment = render_segment(
                &ctx.logger,
                &ctx.tools,
                image,
                &ctx.config,
                dimensions,
                subtitle,
                ctx.font.as_deref(),
                &seg_path,
            )?;

            ctx.temp.register(&seg_path);
            output.segments.push(segment);
        }

        state.render = Some(output);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        let segments = state.segments();
        if segments.len() != ctx.story.images.len() {
            return Err(StepError::invalid_output(format!(
                "Rendered {} segment(s) for {} image(s)",
                segments.len(),
                ctx.story.images.len()
            )));
        }
        for segment in segments {
            if !segment.rendered_path.exists() {
                return Err(StepError::invalid_output(format!(
                    "Segment file missing: {}",
                    segment.rendered_path.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::test_support::test_context;
    use crate::orchestrator::types::ProbeOutput;

    #[test]
    fn render_step_has_correct_name() {
        let step = RenderStep::new();
        assert_eq!(step.name(), "Render");
    }

    #[test]
    fn execute_requires_probe_output() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let step = RenderStep::new();
        let mut state = RunState::new("test");
        let err = step.execute(&ctx, &mut state).unwrap_err();
        assert!(err.to_string().contains("not probed"));
    }

    #[test]
    fn validate_output_checks_segment_count() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let step = RenderStep::new();
        let mut state = RunState::new("test");
        state.probe = Some(ProbeOutput {
            width: 1920,
            height: 1080,
            fallback: false,
        });
        state.render = Some(RenderOutput::default());

        let err = step.validate_output(&ctx, &state).unwrap_err();
        assert!(err.to_string().contains("0 segment(s)"));
    }
}
