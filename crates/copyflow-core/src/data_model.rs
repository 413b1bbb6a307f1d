//! Data Model: GenerationRequest, BrandVoice, GeneratedContent
use crate::error::CopyflowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of marketing copy being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    SocialPost,
    Email,
    LandingPage,
    AdCopy,
}

impl ContentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::SocialPost => "social_post",
            ContentCategory::Email => "email",
            ContentCategory::LandingPage => "landing_page",
            ContentCategory::AdCopy => "ad_copy",
        }
    }

    pub fn all() -> [ContentCategory; 4] {
        [
            ContentCategory::SocialPost,
            ContentCategory::Email,
            ContentCategory::LandingPage,
            ContentCategory::AdCopy,
        ]
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text parameters steering the generator's style
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandVoice {
    pub personality: String,
    pub tone: String,
    pub target_audience: String,
    pub industry_context: String,
}

impl BrandVoice {
    pub fn new(
        personality: impl Into<String>,
        tone: impl Into<String>,
        target_audience: impl Into<String>,
        industry_context: impl Into<String>,
    ) -> Self {
        Self {
            personality: personality.into(),
            tone: tone.into(),
            target_audience: target_audience.into(),
            industry_context: industry_context.into(),
        }
    }
}

/// A single request for marketing copy.
///
/// Requests are immutable once built. A retry with different instructions is
/// a new value produced by [`GenerationRequest::with_prompt`], which keeps the
/// originating `id` so batch results can be traced back to the caller's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    prompt: String,
    #[serde(default)]
    brand_voice: BrandVoice,
    content_category: ContentCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, content_category: ContentCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            brand_voice: BrandVoice::default(),
            content_category,
            platform: None,
        }
    }

    /// Set the brand voice
    pub fn with_brand_voice(mut self, brand_voice: BrandVoice) -> Self {
        self.brand_voice = brand_voice;
        self
    }

    /// Set the target platform (e.g. "instagram")
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Derive a new request with a replacement prompt. `self` is left untouched.
    pub fn with_prompt(&self, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn brand_voice(&self) -> &BrandVoice {
        &self.brand_voice
    }

    pub fn content_category(&self) -> ContentCategory {
        self.content_category
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Parse a JSON array of requests
    pub fn list_from_json(raw: &str) -> Result<Vec<Self>, CopyflowError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Output of one generation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub text: String,
    pub tokens_used: u32,
    pub cost_estimate: f64,
    /// Generator's own confidence (0.0 to 1.0)
    pub confidence_score: f32,
}

impl GeneratedContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens_used: 0,
            cost_estimate: 0.0,
            confidence_score: 1.0,
        }
    }

    pub fn with_usage(mut self, tokens_used: u32, cost_estimate: f64) -> Self {
        self.tokens_used = tokens_used;
        self.cost_estimate = cost_estimate.max(0.0);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence_score = confidence.clamp(0.0, 1.0);
        self
    }

    /// True when the generator produced nothing usable
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_prompt_keeps_identity() {
        let original = GenerationRequest::new("Write a post about grooming", ContentCategory::SocialPost)
            .with_platform("instagram");
        let retry = original.with_prompt("Write a post about grooming. Keep it factual.");

        assert_eq!(retry.id(), original.id());
        assert_eq!(retry.platform(), Some("instagram"));
        assert_eq!(original.prompt(), "Write a post about grooming");
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&ContentCategory::LandingPage).unwrap();
        assert_eq!(json, "\"landing_page\"");

        let parsed: ContentCategory = serde_json::from_str("\"ad_copy\"").unwrap();
        assert_eq!(parsed, ContentCategory::AdCopy);
    }

    #[test]
    fn test_request_deserializes_without_id() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{
                "prompt": "Spring vaccination reminder",
                "brandVoice": {
                    "personality": "caring",
                    "tone": "warm",
                    "targetAudience": "dog owners",
                    "industryContext": "veterinary clinic"
                },
                "contentCategory": "email"
            }"#,
        )
        .unwrap();

        assert_eq!(request.content_category(), ContentCategory::Email);
        assert_eq!(request.brand_voice().tone, "warm");
        assert!(request.platform().is_none());
    }

    #[test]
    fn test_request_list_from_json() {
        let requests = GenerationRequest::list_from_json(
            r#"[
                {"prompt": "Puppy class signup", "contentCategory": "social_post", "platform": "instagram"},
                {"prompt": "Dental month", "contentCategory": "email"}
            ]"#,
        )
        .unwrap();
        assert_eq!(requests.len(), 2);
        assert_ne!(requests[0].id(), requests[1].id());
        assert_eq!(requests[0].platform(), Some("instagram"));

        let err = GenerationRequest::list_from_json(r#"{"prompt": "not a list"}"#).unwrap_err();
        assert!(matches!(err, CopyflowError::SerializeError(_)));
    }

    #[test]
    fn test_generated_content_clamps() {
        let content = GeneratedContent::new("  ")
            .with_usage(10, -1.0)
            .with_confidence(1.7);

        assert!(content.is_empty());
        assert_eq!(content.cost_estimate, 0.0);
        assert_eq!(content.confidence_score, 1.0);
    }
}
