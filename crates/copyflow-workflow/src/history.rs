//! Run history ledger
//!
//! Append-only record of every step a workflow run takes, used for metrics
//! and for showing callers exactly what was tried.

use chrono::{DateTime, Utc};
use copyflow_compliance::ViolationCategory;
use copyflow_core::GeneratedContent;
use serde::{Deserialize, Serialize};

/// Kind of history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    ContentGenerated,
    ComplianceValidated,
    PromptImproved,
    Error,
}

/// Step-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepData {
    ContentGenerated {
        attempt: u32,
        /// Exact prompt sent to the generator
        prompt: String,
        content: GeneratedContent,
        /// blake3 of the generated text
        content_hash: String,
    },
    ComplianceValidated {
        attempt: u32,
        is_compliant: bool,
        violation_count: usize,
        critical_count: usize,
        confidence: f32,
    },
    PromptImproved {
        attempt: u32,
        categories: Vec<ViolationCategory>,
        previous_prompt: String,
        improved_prompt: String,
    },
    Error {
        attempt: u32,
        message: String,
    },
}

impl StepData {
    pub fn step(&self) -> WorkflowStep {
        match self {
            StepData::ContentGenerated { .. } => WorkflowStep::ContentGenerated,
            StepData::ComplianceValidated { .. } => WorkflowStep::ComplianceValidated,
            StepData::PromptImproved { .. } => WorkflowStep::PromptImproved,
            StepData::Error { .. } => WorkflowStep::Error,
        }
    }

    pub fn attempt(&self) -> u32 {
        match self {
            StepData::ContentGenerated { attempt, .. }
            | StepData::ComplianceValidated { attempt, .. }
            | StepData::PromptImproved { attempt, .. }
            | StepData::Error { attempt, .. } => *attempt,
        }
    }

    /// Payload for a generated attempt, hashing the text
    pub fn content_generated(attempt: u32, prompt: impl Into<String>, content: GeneratedContent) -> Self {
        let content_hash = format!("blake3:{}", blake3::hash(content.text.as_bytes()));
        StepData::ContentGenerated {
            attempt,
            prompt: prompt.into(),
            content,
            content_hash,
        }
    }
}

/// A single timestamped step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub step: WorkflowStep,
    pub data: StepData,
}

impl WorkflowHistoryEntry {
    pub fn new(data: StepData) -> Self {
        Self {
            timestamp: Utc::now(),
            step: data.step(),
            data,
        }
    }

    /// Generated content, for `content_generated` entries
    pub fn content(&self) -> Option<&GeneratedContent> {
        match &self.data {
            StepData::ContentGenerated { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// Ordered, append-only step log owned by one run
#[derive(Debug, Clone, Default)]
pub struct WorkflowHistory {
    entries: Vec<WorkflowHistoryEntry>,
}

impl WorkflowHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, data: StepData) {
        self.entries.push(WorkflowHistoryEntry::new(data));
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[WorkflowHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, step: WorkflowStep) -> usize {
        self.entries.iter().filter(|e| e.step == step).count()
    }

    pub fn last(&self) -> Option<&WorkflowHistoryEntry> {
        self.entries.last()
    }

    /// Entries for one attempt
    pub fn for_attempt(&self, attempt: u32) -> Vec<&WorkflowHistoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.data.attempt() == attempt)
            .collect()
    }

    /// Export to JSON Lines; fails if any entry cannot be serialized
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let lines = self
            .entries
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }
}
