//! Generator contract: the external service that writes the copy
use crate::data_model::{BrandVoice, ContentCategory, GeneratedContent};
use async_trait::async_trait;

/// The content generation collaborator.
///
/// Implementations talk to a model provider (or a local mock). The workflow
/// only depends on this contract; latency and failure are expected.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Short identifier used in logs (ex: "openai:gpt-4o", "mock")
    fn name(&self) -> &str {
        "generator"
    }

    /// Produce copy for a prompt
    async fn generate(
        &self,
        prompt: &str,
        brand_voice: &BrandVoice,
        category: ContentCategory,
        platform: Option<&str>,
    ) -> Result<GeneratedContent, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Provider reported a failure
    Failed(String),
    /// Provider answered with an unusable payload
    Malformed(String),
    /// Provider answered with no text
    EmptyOutput,
    /// The attempt exceeded its time budget
    Timeout { elapsed_ms: u64 },
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Failed(msg) => write!(f, "GEN/FAILED: {}", msg),
            Self::Malformed(msg) => write!(f, "GEN/MALFORMED: {}", msg),
            Self::EmptyOutput => write!(f, "GEN/EMPTY: generator returned no text"),
            Self::Timeout { elapsed_ms } => {
                write!(f, "GEN/TIMEOUT: no response after {}ms", elapsed_ms)
            }
        }
    }
}

impl std::error::Error for GenerationError {}
