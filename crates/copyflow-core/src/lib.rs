//! Copyflow Core: data model, generator contract, and configuration
//!
//! Shared vocabulary for the compliant content generation workflow. The
//! compliance engine and the orchestrator both build on the types here.

pub mod config;
pub mod data_model;
pub mod error;
pub mod generator;

pub use config::WorkflowConfig;
pub use data_model::{BrandVoice, ContentCategory, GeneratedContent, GenerationRequest};
pub use error::CopyflowError;
pub use generator::{ContentGenerator, GenerationError};

/// Engine version reported by the CLI
pub const COPYFLOW_VERSION: &str = "0.1.0";
