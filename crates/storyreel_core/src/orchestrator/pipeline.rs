//! Pipeline runner that executes steps in sequence.

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, RunState, StepOutcome};

/// Pipeline that runs a sequence of steps.
///
/// The pipeline executes steps in order, running validation before
/// and after each step, and tracks which steps were executed.
pub struct Pipeline {
    /// Steps to execute in order.
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the pipeline.
    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Run the pipeline with the given context and state.
    ///
    /// Executes each step in order:
    /// 1. Run `validate_input`
    /// 2. Run `execute`
    /// 3. Run `validate_output` (if execute returned Success)
    ///
    /// A `Skipped` outcome is logged and the pipeline continues with the
    /// next step. Any error stops the run.
    pub fn run(&self, ctx: &Context, state: &mut RunState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult {
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        };

        for step in &self.steps {
            let step_name = step.name();
            ctx.logger.phase(step_name);

            // Validate input
            ctx.logger.debug(&format!("Validating input for '{}'", step_name));
            if let Err(e) = step.validate_input(ctx) {
                ctx.logger.error(&format!("Input validation failed: {}", e));
                return Err(PipelineError::step_failed(&ctx.run_name, step_name, e));
            }

            // Execute
            ctx.logger.debug(&format!("Executing '{}'", step_name));
            let outcome = step.execute(ctx, state).map_err(|e| {
                ctx.logger.error(&format!("Execution failed: {}", e));
                PipelineError::step_failed(&ctx.run_name, step_name, e)
            })?;

            match outcome {
                StepOutcome::Success => {
                    // Validate output
                    ctx.logger
                        .debug(&format!("Validating output for '{}'", step_name));
                    if let Err(e) = step.validate_output(ctx, state) {
                        ctx.logger.error(&format!("Output validation failed: {}", e));
                        return Err(PipelineError::step_failed(&ctx.run_name, step_name, e));
                    }

                    ctx.logger.success(&format!("{} completed", step_name));
                    result.steps_completed.push(step_name.to_string());
                }
                StepOutcome::Skipped(reason) => {
                    ctx.logger
                        .info(&format!("{} skipped: {}", step_name, reason));
                    result.steps_skipped.push(step_name.to_string());
                }
            }
        }

        ctx.logger.success("Pipeline completed successfully");

        Ok(result)
    }

    /// Get the number of steps in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRunResult {
    /// Steps that completed successfully.
    pub steps_completed: Vec<String>,
    /// Steps that were skipped.
    pub steps_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// Check if all steps completed (none skipped).
    pub fn all_completed(&self) -> bool {
        self.steps_skipped.is_empty()
    }

    /// Total number of steps that ran.
    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::errors::StepError;
    use crate::orchestrator::test_support::test_context;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingStep {
        name: &'static str,
        execute_count: Arc<AtomicUsize>,
        outcome: fn() -> Result<StepOutcome, StepError>,
    }

    impl PipelineStep for CountingStep {
        fn name(&self) -> &str {
            self.name
        }

        fn validate_input(&self, _ctx: &Context) -> Result<(), StepError> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut RunState) -> Result<StepOutcome, StepError> {
            self.execute_count.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }

        fn validate_output(&self, _ctx: &Context, _state: &RunState) -> Result<(), StepError> {
            Ok(())
        }
    }

    #[test]
    fn pipeline_builds_correctly() {
        let pipeline = Pipeline::new()
            .with_step(CountingStep {
                name: "Step1",
                execute_count: Arc::new(AtomicUsize::new(0)),
                outcome: || Ok(StepOutcome::Success),
            })
            .with_step(CountingStep {
                name: "Step2",
                execute_count: Arc::new(AtomicUsize::new(0)),
                outcome: || Ok(StepOutcome::Success),
            });

        assert_eq!(pipeline.step_count(), 2);
        assert_eq!(pipeline.step_names(), vec!["Step1", "Step2"]);
    }

    #[test]
    fn pipeline_runs_steps_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let mut state = RunState::new("test");

        let count1 = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::new(AtomicUsize::new(0));

        let pipeline = Pipeline::new()
            .with_step(CountingStep {
                name: "First",
                execute_count: Arc::clone(&count1),
                outcome: || Ok(StepOutcome::Success),
            })
            .with_step(CountingStep {
                name: "Second",
                execute_count: Arc::clone(&count2),
                outcome: || Ok(StepOutcome::Skipped("nothing to do".to_string())),
            });

        let result = pipeline.run(&ctx, &mut state).unwrap();

        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
        assert_eq!(result.steps_completed, vec!["First"]);
        assert_eq!(result.steps_skipped, vec!["Second"]);
        assert!(!result.all_completed());
        assert_eq!(result.total_steps(), 2);
    }

    #[test]
    fn pipeline_stops_on_step_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let mut state = RunState::new("test");

        let count_after = Arc::new(AtomicUsize::new(0));

        let pipeline = Pipeline::new()
            .with_step(CountingStep {
                name: "Failing",
                execute_count: Arc::new(AtomicUsize::new(0)),
                outcome: || Err(StepError::other("boom")),
            })
            .with_step(CountingStep {
                name: "Unreached",
                execute_count: Arc::clone(&count_after),
                outcome: || Ok(StepOutcome::Success),
            });

        let err = pipeline.run(&ctx, &mut state).unwrap_err();
        assert!(err.to_string().contains("Failing"));
        assert_eq!(count_after.load(Ordering::SeqCst), 0);
    }
}
