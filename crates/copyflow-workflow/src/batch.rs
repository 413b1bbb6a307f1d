//! Batch coordination with bounded concurrency
//!
//! Requests are split into fixed-size chunks. Chunks run one after another;
//! the members of a chunk run concurrently, each with its own orchestrator,
//! and the next chunk starts only when every member has finished.

use crate::history::WorkflowHistoryEntry;
use crate::metrics::{MetricsAggregator, WorkflowMetrics};
use crate::orchestrator::{WorkflowOrchestrator, WorkflowOutcome};
use copyflow_compliance::{ComplianceValidation, ComplianceValidator};
use copyflow_core::{ContentGenerator, CopyflowError, GenerationRequest, WorkflowConfig};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Outcome for one request in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub request_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempts: u32,
    #[serde(default)]
    pub history: Vec<WorkflowHistoryEntry>,
}

impl From<WorkflowOutcome> for BatchItemResult {
    fn from(outcome: WorkflowOutcome) -> Self {
        Self {
            request_id: outcome.request_id,
            success: outcome.success,
            content: outcome.content,
            compliance: outcome.compliance,
            error: outcome.error,
            attempts: outcome.attempts,
            history: outcome.history,
        }
    }
}

impl BatchItemResult {
    fn aborted(request_id: Uuid, message: String) -> Self {
        Self {
            request_id,
            success: false,
            content: None,
            compliance: None,
            error: Some(message),
            attempts: 0,
            history: Vec::new(),
        }
    }
}

/// Aggregate result of a batch, in input order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

impl BatchResult {
    fn push(&mut self, item: BatchItemResult) {
        if item.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(item);
    }

    /// Cost and attempt metrics across every item's history
    pub fn metrics(&self) -> WorkflowMetrics {
        MetricsAggregator::summarize_many(self.results.iter().map(|r| r.history.as_slice()))
    }
}

pub struct BatchCoordinator {
    generator: Arc<dyn ContentGenerator>,
    validator: Arc<ComplianceValidator>,
    config: WorkflowConfig,
}

impl BatchCoordinator {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            validator: Arc::new(ComplianceValidator::new()),
            config: WorkflowConfig::default(),
        }
    }

    /// Use a validated config for attempt budget, chunk size, and timeout
    pub fn with_config(mut self, config: WorkflowConfig) -> Result<Self, CopyflowError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_validator(mut self, validator: Arc<ComplianceValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run every request; a failing item never affects its siblings
    pub async fn process_batch(&self, requests: Vec<GenerationRequest>) -> BatchResult {
        let chunk_size = self.config.chunk_size.max(1);
        let span = tracing::info_span!("batch", size = requests.len(), chunk_size);

        async {
            let mut result = BatchResult::default();

            for (index, chunk) in requests.chunks(chunk_size).enumerate() {
                tracing::info!(chunk = index, items = chunk.len(), "processing chunk");

                let handles: Vec<_> = chunk
                    .iter()
                    .map(|request| {
                        let request_id = request.id();
                        let mut orchestrator = WorkflowOrchestrator::new(self.generator.clone())
                            .with_validator(self.validator.clone())
                            .with_config(&self.config);
                        let request = request.clone();
                        let handle = tokio::spawn(async move { orchestrator.execute(request).await });
                        (request_id, handle)
                    })
                    .collect();

                let (ids, handles): (Vec<Uuid>, Vec<_>) = handles.into_iter().unzip();
                let joined = join_all(handles).await;

                for (request_id, outcome) in ids.into_iter().zip(joined) {
                    let item = match outcome {
                        Ok(outcome) => BatchItemResult::from(outcome),
                        Err(err) => {
                            tracing::error!(%request_id, error = %err, "batch item aborted");
                            BatchItemResult::aborted(
                                request_id,
                                CopyflowError::BatchError(format!("item aborted: {}", err)).to_string(),
                            )
                        }
                    };
                    result.push(item);
                }
            }

            tracing::info!(
                successful = result.successful,
                failed = result.failed,
                "batch finished"
            );
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_counts() {
        let mut result = BatchResult::default();
        result.push(BatchItemResult::aborted(Uuid::new_v4(), "x".to_string()));
        assert_eq!(result.failed, 1);
        assert_eq!(result.successful, 0);
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.metrics().attempts, 0);
    }
}
