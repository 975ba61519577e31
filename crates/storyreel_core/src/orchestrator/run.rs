//! Single-run entry point for the library.
//!
//! `run_story` wires up the work directory, context, and standard
//! pipeline for one video, and guarantees temporary-artifact cleanup
//! whether the run succeeds or aborts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::models::{RunStatus, StoryBoard, VideoConfig};
use crate::tools::{find_subtitle_font, FfmpegTools};

use super::errors::{PipelineError, PipelineResult};
use super::pipeline::Pipeline;
use super::steps::{ComposeStep, MixStep, NarrateStep, ProbeStep, RenderStep};
use super::temp::TempArtifacts;
use super::types::{Context, RunState};

/// Create the standard pipeline with all steps in order.
///
/// 1. Probe - resolve output dimensions from the first image
/// 2. Narrate - collect or synthesize narration clips
/// 3. Render - encode one segment per image
/// 4. Compose - join segments with transitions
/// 5. Mix - attach audio and deliver the final output
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ProbeStep::new())
        .with_step(NarrateStep::new())
        .with_step(RenderStep::new())
        .with_step(ComposeStep::new())
        .with_step(MixStep::new())
}

/// Run the full story-to-video pipeline once.
///
/// Creates a timestamped work directory under the configured temp root,
/// runs all steps, and releases every registered temporary artifact
/// regardless of the outcome. On abort any partial final output is
/// removed as well, so the output path either holds a complete video or
/// nothing.
pub fn run_story(
    story: StoryBoard,
    config: VideoConfig,
    settings: Settings,
    tools: FfmpegTools,
    logger: Arc<RunLogger>,
) -> PipelineResult<PathBuf> {
    let run_name = format!("run_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let work_dir = PathBuf::from(&settings.paths.temp_root).join(&run_name);
    fs::create_dir_all(&work_dir)
        .map_err(|e| PipelineError::setup_failed(&run_name, e.to_string()))?;

    let font = find_subtitle_font();
    if font.is_none() && story.has_subtitles() {
        logger.warn("No subtitle font available on this system");
    }

    let manifest_path = PathBuf::from(&settings.paths.logs_folder).join(format!("{}.json", run_name));

    let output_path = config.output_path.clone();
    let temp = Arc::new(TempArtifacts::new());

    let ctx = Context {
        story,
        config,
        settings,
        tools,
        font,
        run_name: run_name.clone(),
        work_dir: work_dir.clone(),
        logger: Arc::clone(&logger),
        temp: Arc::clone(&temp),
    };

    let mut state = RunState::new(&run_name);
    state.status = RunStatus::Running;
    let pipeline = create_standard_pipeline();
    let result = pipeline.run(&ctx, &mut state);
    state.status = if result.is_ok() {
        RunStatus::Completed
    } else {
        RunStatus::Failed
    };
    logger.info(&format!("Run {}: {}", state.run_id, state.status));
    write_manifest(&manifest_path, &state, &logger);

    let removed = temp.release();
    if removed > 0 {
        logger.debug(&format!("Removed {} temporary file(s)", removed));
    }

    match result {
        Ok(_) => {
            // Narration subdir and the run dir itself are empty now
            let _ = fs::remove_dir(work_dir.join("narration"));
            let _ = fs::remove_dir(&work_dir);
            Ok(output_path)
        }
        Err(e) => {
            // A failed mux may have left a partial output behind
            if state.mix.is_none() && output_path.exists() {
                let _ = fs::remove_file(&output_path);
            }
            let _ = fs::remove_dir(work_dir.join("narration"));
            let _ = fs::remove_dir(&work_dir);
            Err(e)
        }
    }
}

/// Persist the run manifest next to the logs; failure is non-fatal.
fn write_manifest(path: &Path, state: &RunState, logger: &RunLogger) {
    match serde_json::to_string_pretty(state) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                logger.warn(&format!("Could not write run manifest: {}", e));
            }
        }
        Err(e) => logger.warn(&format!("Could not serialize run manifest: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_has_all_steps_in_order() {
        let pipeline = create_standard_pipeline();
        assert_eq!(
            pipeline.step_names(),
            vec!["Probe", "Narrate", "Render", "Compose", "Mix"]
        );
    }
}
