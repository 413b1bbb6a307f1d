//! Template-based generator for local development.
//!
//! Produces deterministic copy from the brand voice so the workflow can be
//! exercised without a model provider. A "bold" tone adds a superlative the
//! auto-corrector will soften; once the prompt carries compliance
//! requirements the copy stays plain.
use async_trait::async_trait;
use copyflow_core::{BrandVoice, ContentCategory, ContentGenerator, GeneratedContent, GenerationError};
use std::time::Duration;

const COST_PER_TOKEN: f64 = 0.000_02;

pub struct TemplateGenerator {
    latency: Duration,
}

impl TemplateGenerator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "template-mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        brand_voice: &BrandVoice,
        category: ContentCategory,
        platform: Option<&str>,
    ) -> Result<GeneratedContent, GenerationError> {
        tokio::time::sleep(self.latency).await;

        let topic = prompt.lines().next().unwrap_or_default().trim();
        if topic.is_empty() {
            return Err(GenerationError::Malformed("prompt has no topic line".to_string()));
        }

        let constrained = prompt.contains("Compliance requirements:");
        let opener = if brand_voice.tone.contains("bold") && !constrained {
            "The best care in town:"
        } else {
            "Good news for pets and their people:"
        };
        let audience = if brand_voice.target_audience.is_empty() {
            "every pet owner"
        } else {
            brand_voice.target_audience.as_str()
        };

        let mut text = match category {
            ContentCategory::SocialPost => format!("{} {}. Made for {}.", opener, topic, audience),
            ContentCategory::Email => format!(
                "Hi there,\n\n{} {}. We built this for {}.\n\nSee you soon!",
                opener, topic, audience
            ),
            ContentCategory::LandingPage => format!(
                "{} {}\n\nWhy {} choose us: friendly staff and a calm space.",
                opener, topic, audience
            ),
            ContentCategory::AdCopy => format!("{} {}. Book today.", opener, topic),
        };
        if let Some(platform) = platform {
            text.push_str(&format!(" #{}", platform.replace(' ', "")));
        }

        let tokens = (text.split_whitespace().count() as f64 * 1.3).ceil() as u32;
        Ok(GeneratedContent::new(text)
            .with_usage(tokens, tokens as f64 * COST_PER_TOKEN)
            .with_confidence(0.85))
    }
}
