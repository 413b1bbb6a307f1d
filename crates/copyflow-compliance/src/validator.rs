//! Compliance validator: runs the rule table over a piece of copy
use crate::rule::{default_rules, recommendation_for, ComplianceRule};
use crate::violation::{ComplianceValidation, ViolationCategory};
use copyflow_core::ContentCategory;

/// Confidence reported for text with no findings
pub const BASELINE_CONFIDENCE: f32 = 0.95;

/// Confidence lost per finding
pub const CONFIDENCE_STEP: f32 = 0.1;

/// Confidence never drops below this
pub const CONFIDENCE_FLOOR: f32 = 0.3;

/// Rule-based compliance engine. Pure over its rule table and inputs.
#[derive(Debug, Clone)]
pub struct ComplianceValidator {
    rules: Vec<ComplianceRule>,
}

impl ComplianceValidator {
    /// Validator with the built-in rule table
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    pub fn with_rules(rules: Vec<ComplianceRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ComplianceRule] {
        &self.rules
    }

    /// Scan `text` for the given content category.
    ///
    /// Each matching rule contributes one violation, in table order. Empty
    /// text yields a clean result.
    pub fn validate(&self, text: &str, category: ContentCategory) -> ComplianceValidation {
        let violations: Vec<_> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(text, category))
            .collect();

        let mut seen: Vec<ViolationCategory> = Vec::new();
        for violation in &violations {
            if !seen.contains(&violation.category) {
                seen.push(violation.category);
            }
        }
        let recommendations = seen
            .into_iter()
            .map(|c| recommendation_for(c).to_string())
            .collect();

        let confidence = confidence_for(violations.len());

        if !violations.is_empty() {
            tracing::debug!(
                category = %category,
                violations = violations.len(),
                confidence,
                "compliance findings"
            );
        }

        ComplianceValidation::new(text, violations, confidence, recommendations)
    }
}

impl Default for ComplianceValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn confidence_for(violation_count: usize) -> f32 {
    let score = BASELINE_CONFIDENCE - CONFIDENCE_STEP * violation_count as f32;
    score.max(CONFIDENCE_FLOOR)
}
