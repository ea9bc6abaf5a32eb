use serde::Serialize;
use std::time::Instant;
use thiserror::Error;
use tracing::{Instrument, info, warn};

use promptforge_config::StageFailurePolicy;
use promptforge_error_redaction::redact_error_message;
use promptforge_llm::{CompletionClient, CompletionFailure, CompletionOutcome};
use promptforge_utils::error::PromptForgeError;
use promptforge_utils::logging::{log_stage_complete, log_stage_error, stage_span};

use crate::stages::{Stage, analyze_message, enrich_context_message, optimized_prompt_message};

/// Outputs of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub analysis: String,
    pub context: String,
    pub optimized_prompt: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Stage '{stage}' failed: {failure}")]
    StageFailed {
        stage: Stage,
        failure: CompletionFailure,
    },
}

impl PipelineError {
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::StageFailed { stage, .. } => *stage,
        }
    }
}

impl From<PipelineError> for PromptForgeError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::StageFailed { stage, failure } => PromptForgeError::Pipeline {
                stage: stage.to_string(),
                message: redact_error_message(&failure.to_string()),
            },
        }
    }
}

/// True when `problem` is empty or whitespace-only.
///
/// Both front-ends reject such input before any remote call.
#[must_use]
pub fn is_blank_problem(problem: &str) -> bool {
    problem.trim().is_empty()
}

/// Three sequential, data-dependent completion calls.
///
/// Holds no per-run state; one instance can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: CompletionClient,
    policy: StageFailurePolicy,
}

impl Pipeline {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client,
            policy: StageFailurePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: StageFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> StageFailurePolicy {
        self.policy
    }

    /// Run all three stages for `problem`.
    ///
    /// Callers are expected to have rejected blank input already.
    ///
    /// # Errors
    ///
    /// Under [`StageFailurePolicy::Abort`], returns the first stage failure;
    /// later stages are not called. Under [`StageFailurePolicy::Degrade`]
    /// this never fails.
    pub async fn run(&self, problem: &str) -> Result<PipelineResult, PipelineError> {
        self.run_with_progress(problem, |_, _| {}).await
    }

    /// Like [`Pipeline::run`], but calls `on_stage` with each stage's output
    /// as soon as that stage finishes.
    ///
    /// Stages that completed before an abort have already been reported.
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::run`].
    pub async fn run_with_progress<F>(
        &self,
        problem: &str,
        mut on_stage: F,
    ) -> Result<PipelineResult, PipelineError>
    where
        F: FnMut(Stage, &str),
    {
        let started = Instant::now();
        info!(
            problem_chars = problem.chars().count(),
            policy = %self.policy,
            "Starting prompt optimization pipeline"
        );

        let analysis = self.stage(Stage::Analyze, analyze_message(problem)).await?;
        on_stage(Stage::Analyze, &analysis);

        let context = self
            .stage(
                Stage::EnrichContext,
                enrich_context_message(problem, &analysis),
            )
            .await?;
        on_stage(Stage::EnrichContext, &context);

        let optimized_prompt = self
            .stage(
                Stage::GenerateOptimizedPrompt,
                optimized_prompt_message(problem, &analysis, &context),
            )
            .await?;
        on_stage(Stage::GenerateOptimizedPrompt, &optimized_prompt);

        info!(
            duration_ms = started.elapsed().as_millis() as u64,
            "Pipeline completed"
        );

        Ok(PipelineResult {
            analysis,
            context,
            optimized_prompt,
        })
    }

    async fn stage(&self, stage: Stage, user_message: String) -> Result<String, PipelineError> {
        let span = stage_span(stage.as_str(), self.client.settings().model());
        async {
            let started = Instant::now();
            let outcome = self
                .client
                .call(stage.system_instruction(), &user_message)
                .await;
            let elapsed = started.elapsed().as_millis();

            match outcome {
                CompletionOutcome::Completed(text) => {
                    log_stage_complete(stage.as_str(), elapsed, text.chars().count());
                    Ok(text)
                }
                CompletionOutcome::Failed(failure) => {
                    let message = redact_error_message(&failure.to_string());
                    log_stage_error(stage.as_str(), failure.kind(), &message, elapsed);
                    match self.policy {
                        StageFailurePolicy::Abort => {
                            Err(PipelineError::StageFailed { stage, failure })
                        }
                        StageFailurePolicy::Degrade => {
                            warn!(
                                stage = %stage,
                                "Continuing with diagnostic text as stage output"
                            );
                            Ok(failure.to_string())
                        }
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_problem_detection() {
        assert!(is_blank_problem(""));
        assert!(is_blank_problem("   \t\n"));
        assert!(!is_blank_problem(" x "));
    }

    #[test]
    fn test_pipeline_error_maps_to_llm_exit_code() {
        let err = PipelineError::StageFailed {
            stage: Stage::EnrichContext,
            failure: CompletionFailure::Unparseable,
        };
        let top: PromptForgeError = err.into();
        assert_eq!(top.to_exit_code().as_i32(), 70);
        assert_eq!(
            top.to_string(),
            "Pipeline stage 'enrich_context' failed: Unable to parse response"
        );
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::StageFailed {
            stage: Stage::Analyze,
            failure: CompletionFailure::EmptyContent,
        };
        assert_eq!(err.to_string(), "Stage 'analyze' failed: No response generated");
        assert_eq!(err.stage(), Stage::Analyze);
    }
}
