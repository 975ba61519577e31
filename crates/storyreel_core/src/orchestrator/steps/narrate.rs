//! Narrate step - provides narration clips for the final mix.
//!
//! User-supplied clips take precedence and are used as-is. Otherwise,
//! when narration is enabled and subtitles exist, the configured
//! synthesis command produces one clip per non-empty subtitle. Synthesis
//! trouble degrades the run to no narration instead of aborting;
//! all-or-nothing within the batch, so no partial narration survives.

use std::time::Duration;

use crate::narration::synthesize_batch;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, NarrationOutput, RunState, StepOutcome};
use crate::tools::find_synth_command;

/// Narrate step for collecting or synthesizing narration clips.
pub struct NarrateStep;

impl NarrateStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NarrateStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for NarrateStep {
    fn name(&self) -> &str {
        "Narrate"
    }

    fn description(&self) -> &str {
        "Collect or synthesize narration audio clips"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        // User-supplied clips win; StoryBoard::scan already dropped
        // any that do not exist.
        if !ctx.story.narration.is_empty() {
            ctx.logger.info(&format!(
                "Using {} user-supplied narration clip(s)",
                ctx.story.narration.len()
            ));
            state.narration = Some(NarrationOutput {
                clips: ctx.story.narration.clone(),
                synthesized: false,
            });
            return Ok(StepOutcome::Success);
        }

        if !ctx.config.narration_enabled {
            return Ok(StepOutcome::Skipped("Narration not requested".to_string()));
        }

        if !ctx.story.has_subtitles() {
            ctx.logger
                .warn("Narration requested but there are no subtitles to narrate");
            return Ok(StepOutcome::Skipped("No subtitles".to_string()));
        }

        let command = match find_synth_command(&ctx.settings.narration.command) {
            Some(cmd) => cmd,
            None => {
                ctx.logger.warn(&format!(
                    "Narration command '{}' not found, continuing without narration",
                    ctx.settings.narration.command
                ));
                return Ok(StepOutcome::Skipped(
                    "Synthesis command not found".to_string(),
                ));
            }
        };

        ctx.logger.section("Narration synthesis");
        let timeout = Duration::from_secs(ctx.settings.narration.timeout_secs);
        let out_dir = ctx.work_dir.join("narration");

        match synthesize_batch(
            &ctx.logger,
            &command,
            &ctx.story.subtitles,
            &ctx.config.narration_voice,
            ctx.config.narration_speed,
            timeout,
            &out_dir,
        ) {
            Ok(clips) => {
                for clip in &clips {
                    ctx.temp.register(clip);
                }
                ctx.logger
                    .info(&format!("Synthesized {} narration clip(s)", clips.len()));
                state.narration = Some(NarrationOutput {
                    clips,
                    synthesized: true,
                });
                Ok(StepOutcome::Success)
            }
            Err(e) => {
                ctx.logger.warn(&format!(
                    "Narration synthesis failed ({}), continuing without narration",
                    e
                ));
                Ok(StepOutcome::Skipped("Synthesis failed".to_string()))
            }
        }
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        // Success implies clips were recorded.
        match state.narration {
            Some(ref n) if !n.clips.is_empty() => Ok(()),
            _ => Err(StepError::invalid_output("No narration clips recorded")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::test_support::test_context;
    use std::path::PathBuf;

    #[test]
    fn user_clips_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        ctx.story.narration = vec![dir.path().join("a.wav"), dir.path().join("b.wav")];

        let step = NarrateStep::new();
        let mut state = RunState::new("test");
        let outcome = step.execute(&ctx, &mut state).unwrap();

        assert_eq!(outcome, StepOutcome::Success);
        let narration = state.narration.unwrap();
        assert!(!narration.synthesized);
        assert_eq!(narration.clips.len(), 2);
        // User clips are not temporaries
        assert!(ctx.temp.is_empty());
    }

    #[test]
    fn disabled_narration_skips() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let step = NarrateStep::new();
        let mut state = RunState::new("test");
        let outcome = step.execute(&ctx, &mut state).unwrap();

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(state.narration.is_none());
    }

    #[test]
    fn enabled_without_subtitles_skips() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        ctx.config.narration_enabled = true;

        let step = NarrateStep::new();
        let mut state = RunState::new("test");
        let outcome = step.execute(&ctx, &mut state).unwrap();

        assert_eq!(outcome, StepOutcome::Skipped("No subtitles".to_string()));
    }

    #[test]
    fn missing_command_skips() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        ctx.config.narration_enabled = true;
        ctx.story.subtitles = vec!["hello".to_string()];
        ctx.settings.narration.command = "no-such-synth-command-xyz".to_string();

        let step = NarrateStep::new();
        let mut state = RunState::new("test");
        let outcome = step.execute(&ctx, &mut state).unwrap();

        assert_eq!(
            outcome,
            StepOutcome::Skipped("Synthesis command not found".to_string())
        );
    }

    #[test]
    fn validate_output_needs_clips() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let step = NarrateStep::new();

        let mut state = RunState::new("test");
        assert!(step.validate_output(&ctx, &state).is_err());

        state.narration = Some(NarrationOutput {
            clips: vec![PathBuf::from("narration_001.wav")],
            synthesized: true,
        });
        assert!(step.validate_output(&ctx, &state).is_ok());
    }
}
