//! Copyflow Workflow: compliant content generation
//!
//! Drives a single request through generate → validate → correct/retry, and
//! fans many requests out with bounded concurrency.
//!
//! # Run Flow
//!
//! ```text
//! idle → generating → validating ─┬→ completed (compliant or auto-corrected)
//!            ↑                    │
//!            └── prompt_improved ←┤ critical violation, attempts remain
//!                                 └→ error (attempt budget exhausted)
//! ```
//!
//! Every step appends to the run's [`WorkflowHistory`], which is returned
//! with the outcome and feeds [`MetricsAggregator`].

pub mod batch;
pub mod history;
pub mod metrics;
pub mod orchestrator;
pub mod state;

pub use batch::{BatchCoordinator, BatchItemResult, BatchResult};
pub use history::{StepData, WorkflowHistory, WorkflowHistoryEntry, WorkflowStep};
pub use metrics::{MetricsAggregator, WorkflowMetrics};
pub use orchestrator::{WorkflowOrchestrator, WorkflowOutcome};
pub use state::{RunPhase, WorkflowRunState};
