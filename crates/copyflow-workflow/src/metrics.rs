//! Workflow metrics derived from run history
//!
//! Everything here is computed by filtering and summing history entries;
//! nothing is tracked separately.

use crate::history::{WorkflowHistoryEntry, WorkflowStep};
use serde::{Deserialize, Serialize};

/// Summary of one or more runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMetrics {
    /// Generated attempts (`content_generated` entries)
    pub attempts: u32,
    /// Failed attempts (`error` entries)
    pub errors: u32,
    pub prompt_improvements: u32,
    pub total_cost: f64,
    pub total_tokens: u64,
    /// (attempts - errors) / attempts, or 0 with no attempts.
    ///
    /// `errors` are counted separately from `attempts`, so a run whose
    /// generator failed more often than it produced content reports a
    /// negative rate (fail, fail, succeed gives -1.0). The value is not
    /// clamped; read it together with `errors`.
    pub success_rate: f64,
}

impl WorkflowMetrics {
    pub fn avg_cost_per_attempt(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.total_cost / self.attempts as f64
        }
    }

    pub fn avg_tokens_per_attempt(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.total_tokens as f64 / self.attempts as f64
        }
    }
}

pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Summarize a single run's history
    pub fn summarize(history: &[WorkflowHistoryEntry]) -> WorkflowMetrics {
        Self::summarize_many(std::iter::once(history))
    }

    /// Summarize several runs as one population
    pub fn summarize_many<'a, I>(histories: I) -> WorkflowMetrics
    where
        I: IntoIterator<Item = &'a [WorkflowHistoryEntry]>,
    {
        let mut metrics = WorkflowMetrics::default();

        for entry in histories.into_iter().flatten() {
            match entry.step {
                WorkflowStep::ContentGenerated => {
                    metrics.attempts += 1;
                    if let Some(content) = entry.content() {
                        metrics.total_cost += content.cost_estimate;
                        metrics.total_tokens += content.tokens_used as u64;
                    }
                }
                WorkflowStep::Error => metrics.errors += 1,
                WorkflowStep::PromptImproved => metrics.prompt_improvements += 1,
                WorkflowStep::ComplianceValidated => {}
            }
        }

        metrics.success_rate = if metrics.attempts > 0 {
            (metrics.attempts as f64 - metrics.errors as f64) / metrics.attempts as f64
        } else {
            0.0
        };

        metrics
    }
}
