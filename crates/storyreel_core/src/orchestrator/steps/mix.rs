//! Mix step - attaches audio and delivers the final output.
//!
//! Decides which of the four audio cases applies (silent, music only,
//! narration only, both), concatenates narration clips when present,
//! and performs the final mux with the video stream copied untouched.
//! Configured music that does not exist on disk is dropped with a
//! warning rather than failing the run.

use crate::audio::{build_audio_filter, concat_narration, deliver_video_only, mux_output, AudioPlan};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, MixOutput, RunState, StepOutcome};

/// File name of the concatenated narration track inside the work dir.
const NARRATION_FILE: &str = "narration.wav";

/// Mix step for the final audio mux and delivery.
pub struct MixStep;

impl MixStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MixStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for MixStep {
    fn name(&self) -> &str {
        "Mix"
    }

    fn description(&self) -> &str {
        "Mix audio and write the final output"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let combined_path = state
            .compose
            .as_ref()
            .map(|c| c.combined_path.clone())
            .ok_or_else(|| StepError::invalid_input("No composed video to mix"))?;

        let mut plan = AudioPlan::default();

        let clips = state.narration_clips().to_vec();
        if !clips.is_empty() {
            let narration_path = ctx.work_dir.join(NARRATION_FILE);
            ctx.logger.info(&format!(
                "Concatenating {} narration clip(s)",
                clips.len()
            ));
            concat_narration(&ctx.logger, &ctx.tools, &clips, &narration_path)?;
            ctx.temp.register(&narration_path);
            plan.narration = Some(narration_path);
        }

        if let Some(ref music) = ctx.config.background_music {
            if music.is_file() {
                plan.music = Some(music.clone());
            } else {
                ctx.logger.warn(&format!(
                    "Background music not found, skipping: {}",
                    music.display()
                ));
            }
        }

        let case = plan.case_name();
        ctx.logger.info(&format!("Audio case: {}", case));

        let output_path = ctx.config.output_path.clone();
        let filter = build_audio_filter(
            plan.narration.is_some(),
            plan.music.is_some(),
            ctx.video_duration_secs(),
        );
        match filter {
            Some(filter) => mux_output(
                &ctx.logger,
                &ctx.tools,
                &combined_path,
                &plan,
                &filter,
                &output_path,
            )?,
            None => deliver_video_only(&combined_path, &output_path)?,
        }

        state.mix = Some(MixOutput {
            output_path,
            audio_case: case.to_string(),
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match state.mix {
            Some(ref m) if m.output_path.exists() => Ok(()),
            Some(ref m) => Err(StepError::invalid_output(format!(
                "Final output missing: {}",
                m.output_path.display()
            ))),
            None => Err(StepError::invalid_output("No mix output recorded")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::test_support::test_context;
    use crate::orchestrator::types::ComposeOutput;
    use std::fs;

    #[test]
    fn mix_step_has_correct_name() {
        let step = MixStep::new();
        assert_eq!(step.name(), "Mix");
    }

    #[test]
    fn execute_requires_composed_video() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let step = MixStep::new();
        let mut state = RunState::new("test");
        let err = step.execute(&ctx, &mut state).unwrap_err();
        assert!(err.to_string().contains("No composed video"));
    }

    #[test]
    fn silent_case_renames_combined_video() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        let combined = dir.path().join("combined.mp4");
        fs::write(&combined, b"video").unwrap();

        let mut state = RunState::new("test");
        state.compose = Some(ComposeOutput {
            combined_path: combined.clone(),
            total_frames: 40,
            fade_window: 10,
        });

        let step = MixStep::new();
        let outcome = step.execute(&ctx, &mut state).unwrap();

        assert_eq!(outcome, StepOutcome::Success);
        assert!(!combined.exists());
        assert!(ctx.config.output_path.exists());
        assert_eq!(state.mix.unwrap().audio_case, "silent");
    }

    #[test]
    fn missing_music_is_dropped_silently_from_plan() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        ctx.config.background_music = Some(dir.path().join("missing.mp3"));

        let combined = dir.path().join("combined.mp4");
        fs::write(&combined, b"video").unwrap();

        let mut state = RunState::new("test");
        state.compose = Some(ComposeOutput {
            combined_path: combined,
            total_frames: 40,
            fade_window: 10,
        });

        let step = MixStep::new();
        step.execute(&ctx, &mut state).unwrap();

        // Falls back to the silent case rather than failing
        assert_eq!(state.mix.unwrap().audio_case, "silent");
    }
}
