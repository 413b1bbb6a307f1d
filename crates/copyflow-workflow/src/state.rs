//! Per-run state owned by the orchestrator
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phase of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Generating,
    Validating,
    Completed,
    Error,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Completed | RunPhase::Error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunState {
    run_id: Uuid,
    current_step: RunPhase,
    attempts: u32,
    final_content: Option<String>,
    last_error: Option<String>,
}

impl WorkflowRunState {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            current_step: RunPhase::Idle,
            attempts: 0,
            final_content: None,
            last_error: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn current_step(&self) -> RunPhase {
        self.current_step
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn final_content(&self) -> Option<&str> {
        self.final_content.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn transition(&mut self, to: RunPhase) {
        tracing::debug!(run_id = %self.run_id, from = ?self.current_step, to = ?to, "run transition");
        self.current_step = to;
    }

    pub(crate) fn begin_attempt(&mut self, attempt: u32) {
        self.attempts = attempt;
        self.transition(RunPhase::Generating);
    }

    pub(crate) fn complete(&mut self, content: String) {
        self.final_content = Some(content);
        self.transition(RunPhase::Completed);
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.last_error = Some(message);
        self.transition(RunPhase::Error);
    }
}

impl Default for WorkflowRunState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut state = WorkflowRunState::new();
        assert_eq!(state.current_step(), RunPhase::Idle);

        state.begin_attempt(1);
        assert_eq!(state.current_step(), RunPhase::Generating);
        state.transition(RunPhase::Validating);
        state.complete("done".to_string());

        assert!(state.current_step().is_terminal());
        assert_eq!(state.final_content(), Some("done"));
        assert_eq!(state.attempts(), 1);
    }

    #[test]
    fn test_failure_keeps_message() {
        let mut state = WorkflowRunState::new();
        state.begin_attempt(3);
        state.fail("out of attempts".to_string());

        assert_eq!(state.current_step(), RunPhase::Error);
        assert_eq!(state.last_error(), Some("out of attempts"));
        assert!(state.final_content().is_none());
    }
}
