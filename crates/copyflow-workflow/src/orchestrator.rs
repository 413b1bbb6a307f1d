//! Workflow Orchestrator: generate → validate → correct/retry for one request
use crate::history::{StepData, WorkflowHistory, WorkflowHistoryEntry};
use crate::metrics::{MetricsAggregator, WorkflowMetrics};
use crate::state::{RunPhase, WorkflowRunState};
use copyflow_compliance::{AutoCorrector, ComplianceValidation, ComplianceValidator, PromptAugmenter};
use copyflow_core::{ContentGenerator, GeneratedContent, GenerationError, GenerationRequest, WorkflowConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Result of one workflow run, with the full history regardless of outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub run_id: Uuid,
    pub request_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Validation of the last generated text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceValidation>,
    pub attempts: u32,
    /// Content was patched by the auto-corrector rather than passing cleanly
    pub auto_corrected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub history: Vec<WorkflowHistoryEntry>,
}

impl WorkflowOutcome {
    pub fn metrics(&self) -> WorkflowMetrics {
        MetricsAggregator::summarize(&self.history)
    }
}

/// Drives a single request to completion.
///
/// One instance holds the state of one run at a time; `run` starts from a
/// fresh state and the previous run's state is dropped.
pub struct WorkflowOrchestrator {
    generator: Arc<dyn ContentGenerator>,
    validator: Arc<ComplianceValidator>,
    max_attempts: u32,
    attempt_timeout: Option<Duration>,
    state: WorkflowRunState,
    history: WorkflowHistory,
}

impl WorkflowOrchestrator {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        let config = WorkflowConfig::default();
        Self {
            generator,
            validator: Arc::new(ComplianceValidator::new()),
            max_attempts: config.max_attempts,
            attempt_timeout: config.attempt_timeout(),
            state: WorkflowRunState::new(),
            history: WorkflowHistory::new(),
        }
    }

    /// Use a shared validator (ex: one with a custom rule table)
    pub fn with_validator(mut self, validator: Arc<ComplianceValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Take the attempt budget and timeout from `config`
    pub fn with_config(mut self, config: &WorkflowConfig) -> Self {
        self.max_attempts = config.max_attempts;
        self.attempt_timeout = config.attempt_timeout();
        self
    }

    pub fn state(&self) -> &WorkflowRunState {
        &self.state
    }

    pub fn history(&self) -> &WorkflowHistory {
        &self.history
    }

    /// Clear all run state and history
    pub fn reset(&mut self) {
        self.state = WorkflowRunState::new();
        self.history.clear();
    }

    /// Run with the configured attempt budget
    pub async fn execute(&mut self, request: GenerationRequest) -> WorkflowOutcome {
        let max_attempts = self.max_attempts;
        self.run(request, max_attempts).await
    }

    /// Run `request` with at most `max_attempts` generation attempts.
    ///
    /// Generator failures and timeouts retry the same request. Critical
    /// compliance violations retry with an augmented prompt. Non-critical
    /// violations are auto-corrected and the run succeeds.
    #[tracing::instrument(
        name = "workflow_run",
        skip_all,
        fields(request_id = %request.id(), run_id = tracing::field::Empty, max_attempts = max_attempts)
    )]
    pub async fn run(&mut self, request: GenerationRequest, max_attempts: u32) -> WorkflowOutcome {
        self.reset();
        tracing::Span::current().record("run_id", tracing::field::display(self.state.run_id()));

        let max_attempts = if max_attempts == 0 {
            tracing::warn!("max_attempts of 0 raised to 1");
            1
        } else {
            max_attempts
        };
        tracing::info!(category = %request.content_category(), "workflow started");

        let request_id = request.id();
        let mut current = request;
        let mut attempt = 1;

        loop {
            self.state.begin_attempt(attempt);

            let content = match self.generate(&current).await {
                Ok(content) => content,
                Err(err) => {
                    let message = err.to_string();
                    tracing::warn!(attempt, error = %message, "generation failed");
                    self.history.record(StepData::Error {
                        attempt,
                        message: message.clone(),
                    });
                    self.state.record_error(message.clone());

                    if attempt < max_attempts {
                        attempt += 1;
                        continue;
                    }
                    return self.fail(
                        request_id,
                        format!(
                            "Content generation failed after {} attempts (max {}): {}",
                            attempt, max_attempts, message
                        ),
                        None,
                    );
                }
            };

            self.history
                .record(StepData::content_generated(attempt, current.prompt(), content.clone()));

            self.state.transition(RunPhase::Validating);
            let validation = self.validator.validate(&content.text, current.content_category());
            let critical_count = validation.critical_count();
            self.history.record(StepData::ComplianceValidated {
                attempt,
                is_compliant: validation.is_compliant(),
                violation_count: validation.violations().len(),
                critical_count,
                confidence: validation.confidence_score(),
            });

            if validation.is_compliant() {
                let text = validation
                    .approved_content()
                    .map(str::to_string)
                    .unwrap_or(content.text);
                return self.complete(request_id, text, validation, false);
            }

            if critical_count == 0 {
                let corrected = AutoCorrector::apply_suggestions(&content.text, validation.violations());
                tracing::info!(
                    attempt,
                    violations = validation.violations().len(),
                    "non-critical violations auto-corrected"
                );
                return self.complete(request_id, corrected, validation, true);
            }

            tracing::warn!(attempt, critical_count, "critical compliance violations");

            if attempt >= max_attempts {
                return self.fail(
                    request_id,
                    format!(
                        "Content still had {} critical compliance violation(s) after {} attempts (max {})",
                        critical_count, attempt, max_attempts
                    ),
                    Some(validation),
                );
            }

            let improved = PromptAugmenter::improve(&current, validation.violations());
            self.history.record(StepData::PromptImproved {
                attempt,
                categories: PromptAugmenter::triggered_categories(validation.violations()),
                previous_prompt: current.prompt().to_string(),
                improved_prompt: improved.prompt().to_string(),
            });
            current = improved;
            attempt += 1;
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent, GenerationError> {
        let call = self.generator.generate(
            request.prompt(),
            request.brand_voice(),
            request.content_category(),
            request.platform(),
        );

        let content = match self.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GenerationError::Timeout {
                    elapsed_ms: limit.as_millis() as u64,
                })??,
            None => call.await?,
        };

        if content.is_empty() {
            return Err(GenerationError::EmptyOutput);
        }

        tracing::debug!(
            generator = self.generator.name(),
            tokens = content.tokens_used,
            cost = content.cost_estimate,
            "content generated"
        );
        Ok(content)
    }

    fn complete(
        &mut self,
        request_id: Uuid,
        content: String,
        validation: ComplianceValidation,
        auto_corrected: bool,
    ) -> WorkflowOutcome {
        self.state.complete(content.clone());
        tracing::info!(attempts = self.state.attempts(), auto_corrected, "workflow completed");

        WorkflowOutcome {
            run_id: self.state.run_id(),
            request_id,
            success: true,
            content: Some(content),
            compliance: Some(validation),
            attempts: self.state.attempts(),
            auto_corrected,
            error: None,
            history: self.history.entries().to_vec(),
        }
    }

    fn fail(
        &mut self,
        request_id: Uuid,
        message: String,
        validation: Option<ComplianceValidation>,
    ) -> WorkflowOutcome {
        self.state.fail(message.clone());
        tracing::warn!(attempts = self.state.attempts(), error = %message, "workflow failed");

        WorkflowOutcome {
            run_id: self.state.run_id(),
            request_id,
            success: false,
            content: None,
            compliance: validation,
            attempts: self.state.attempts(),
            auto_corrected: false,
            error: Some(message),
            history: self.history.entries().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::WorkflowStep;
    use async_trait::async_trait;
    use copyflow_core::{BrandVoice, ContentCategory};
    use std::sync::Mutex;

    /// Replays a fixed script of responses, repeating the last one
    struct ScriptedGenerator {
        script: Vec<Result<&'static str, GenerationError>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<&'static str, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _brand_voice: &BrandVoice,
            _category: ContentCategory,
            _platform: Option<&str>,
        ) -> Result<GeneratedContent, GenerationError> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len().min(self.script.len() - 1);
            calls.push(prompt.to_string());
            self.script[index]
                .clone()
                .map(|text| GeneratedContent::new(text).with_usage(100, 0.002))
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("Announce our new dental chews", ContentCategory::SocialPost)
    }

    #[tokio::test]
    async fn test_clean_first_attempt() {
        let generator = ScriptedGenerator::new(vec![Ok("Fresh breath, happy pup. Try our dental chews!")]);
        let mut orchestrator = WorkflowOrchestrator::new(generator);

        let outcome = orchestrator.run(request(), 3).await;

        assert!(outcome.success);
        assert_eq!(outcome.attempts, 1);
        assert!(!outcome.auto_corrected);
        assert_eq!(outcome.history.len(), 2);
        assert_eq!(outcome.history[0].step, WorkflowStep::ContentGenerated);
        assert_eq!(outcome.history[1].step, WorkflowStep::ComplianceValidated);
        assert_eq!(orchestrator.state().current_step(), RunPhase::Completed);
    }

    #[tokio::test]
    async fn test_auto_correction_path() {
        let generator = ScriptedGenerator::new(vec![Ok("The best dental chews around!")]);
        let mut orchestrator = WorkflowOrchestrator::new(generator);

        let outcome = orchestrator.run(request(), 3).await;

        assert!(outcome.success);
        assert!(outcome.auto_corrected);
        assert_eq!(outcome.content.as_deref(), Some("The excellent dental chews around!"));
        assert!(!outcome.compliance.unwrap().is_compliant());
    }

    #[tokio::test]
    async fn test_retry_uses_augmented_prompt() {
        let generator = ScriptedGenerator::new(vec![
            Ok("These chews cure bad breath forever."),
            Ok("These chews help freshen breath."),
        ]);
        let mut orchestrator = WorkflowOrchestrator::new(generator.clone());

        let outcome = orchestrator.run(request(), 3).await;

        assert!(outcome.success);
        assert_eq!(outcome.attempts, 2);
        let prompts = generator.prompts();
        assert_eq!(prompts[0], "Announce our new dental chews");
        assert!(prompts[1].starts_with(&prompts[0]));
        assert!(prompts[1].len() > prompts[0].len());
        assert_eq!(orchestrator.history().count(WorkflowStep::PromptImproved), 1);
    }

    #[tokio::test]
    async fn test_generator_failure_retries_same_prompt() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerationError::Failed("provider unavailable".to_string())),
            Ok("Fresh breath, happy pup."),
        ]);
        let mut orchestrator = WorkflowOrchestrator::new(generator.clone());

        let outcome = orchestrator.run(request(), 3).await;

        assert!(outcome.success);
        assert_eq!(outcome.attempts, 2);
        let prompts = generator.prompts();
        assert_eq!(prompts[0], prompts[1]);
        assert_eq!(outcome.history[0].step, WorkflowStep::Error);
        assert_eq!(orchestrator.state().last_error().map(|e| e.starts_with("GEN/FAILED")), Some(true));
    }

    #[tokio::test]
    async fn test_metrics_after_failures_then_success() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerationError::Failed("rate limited".to_string())),
            Err(GenerationError::Failed("rate limited".to_string())),
            Ok("Fresh breath, happy pup."),
        ]);
        let mut orchestrator = WorkflowOrchestrator::new(generator);

        let outcome = orchestrator.run(request(), 3).await;
        assert!(outcome.success);
        assert_eq!(outcome.attempts, 3);

        let metrics = outcome.metrics();
        assert_eq!(metrics.attempts, 1);
        assert_eq!(metrics.errors, 2);
        assert_eq!(metrics.total_tokens, 100);
        assert_eq!(metrics.success_rate, -1.0);
    }

    #[tokio::test]
    async fn test_empty_output_is_a_failure() {
        let generator = ScriptedGenerator::new(vec![Ok("   ")]);
        let mut orchestrator = WorkflowOrchestrator::new(generator);

        let outcome = orchestrator.run(request(), 2).await;

        assert!(!outcome.success);
        assert_eq!(outcome.attempts, 2);
        let message = outcome.error.unwrap();
        assert!(message.contains("2 attempts (max 2)"));
        assert!(message.contains("GEN/EMPTY"));
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_once() {
        let generator = ScriptedGenerator::new(vec![Ok("Book a bath today.")]);
        let mut orchestrator = WorkflowOrchestrator::new(generator);

        let outcome = orchestrator.run(request(), 0).await;
        assert!(outcome.success);
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn test_reset_clears_state() {
        let generator = ScriptedGenerator::new(vec![Ok("Book a bath today.")]);
        let mut orchestrator = WorkflowOrchestrator::new(generator);
        orchestrator.run(request(), 3).await;
        assert!(!orchestrator.history().is_empty());

        orchestrator.reset();
        assert!(orchestrator.history().is_empty());
        assert_eq!(orchestrator.state().current_step(), RunPhase::Idle);
        assert_eq!(orchestrator.state().attempts(), 0);
    }
}
