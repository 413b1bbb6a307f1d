//! Compliance rules
//!
//! Each rule is a case-insensitive pattern with a fixed category, severity,
//! and suggestion. A rule fires at most once per scan.

use crate::violation::{ComplianceViolation, Severity, Suggestion, ViolationCategory};
use copyflow_core::ContentCategory;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// A single pattern rule
#[derive(Debug, Clone)]
pub struct ComplianceRule {
    /// Unique identifier (ex: "medical.cure_claim")
    pub id: String,

    pub category: ViolationCategory,

    pub severity: Severity,

    pattern: Regex,

    /// The rule is skipped when this pattern is present (ex: a disclaimer)
    unless_present: Option<Regex>,

    pub suggestion: Suggestion,

    /// Content categories the rule applies to; empty means all
    pub applies_to: Vec<ContentCategory>,
}

impl ComplianceRule {
    /// Create a rule from a pattern. Matching is case-insensitive.
    pub fn new(
        id: impl Into<String>,
        category: ViolationCategory,
        severity: Severity,
        pattern: &str,
        suggestion: Suggestion,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            id: id.into(),
            category,
            severity,
            pattern: compile(pattern)?,
            unless_present: None,
            suggestion,
            applies_to: Vec::new(),
        })
    }

    /// Skip the rule when `pattern` also appears in the text
    pub fn unless(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.unless_present = Some(compile(pattern)?);
        Ok(self)
    }

    /// Restrict the rule to specific content categories
    pub fn only_for(mut self, categories: &[ContentCategory]) -> Self {
        self.applies_to = categories.to_vec();
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn applies(&self, category: ContentCategory) -> bool {
        self.applies_to.is_empty() || self.applies_to.contains(&category)
    }

    /// Scan `text`; returns the violation for the first match
    pub fn evaluate(&self, text: &str, category: ContentCategory) -> Option<ComplianceViolation> {
        if !self.applies(category) {
            return None;
        }

        let found = self.pattern.find(text)?;

        if let Some(exempt) = &self.unless_present {
            if exempt.is_match(text) {
                return None;
            }
        }

        Some(
            ComplianceViolation::new(
                self.id.clone(),
                self.category,
                self.severity,
                self.suggestion.clone(),
            )
            .with_matched_text(found.as_str()),
        )
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

const VET_DISCLAIMER: &str = r"\b(consult|ask|talk to|speak with|check with)\b.{0,20}\b(vet|veterinarian)s?\b";

/// Built-in rule table, in evaluation order
static DEFAULT_RULES: Lazy<Vec<ComplianceRule>> = Lazy::new(|| {
    build_default_rules().expect("built-in compliance rules are valid patterns")
});

fn build_default_rules() -> Result<Vec<ComplianceRule>, regex::Error> {
    use Severity::*;
    use ViolationCategory::*;

    Ok(vec![
        // === Medical ===
        ComplianceRule::new(
            "medical.cure_claim",
            Medical,
            Critical,
            r"\b(cures?|cured|curing)\b",
            Suggestion::new("Remove cure claims; describe how the product supports wellbeing instead"),
        )?,
        ComplianceRule::new(
            "medical.guaranteed_outcome",
            Medical,
            Critical,
            r"\bguaranteed to (heal|treat|fix|eliminate|stop)\b",
            Suggestion::new("Health outcomes cannot be guaranteed"),
        )?,
        ComplianceRule::new(
            "medical.disease_prevention",
            Medical,
            High,
            r"\bprevents? (diseases?|illness(es)?|infections?|cancer|arthritis)\b",
            Suggestion::new("Say the product may help support health rather than prevent disease"),
        )?,
        ComplianceRule::new(
            "medical.clinically_proven",
            Medical,
            Medium,
            r"\bclinically proven\b",
            Suggestion::new("Unless a study is cited, soften the clinical claim")
                .with_replacement("clinically studied"),
        )?,
        ComplianceRule::new(
            "medical.missing_disclaimer",
            Medical,
            Medium,
            r"\b(treatment|therapy|medication|prescription|diagnos\w*|symptoms?)\b",
            Suggestion::new("Add a reminder to consult a veterinarian"),
        )?
        .unless(VET_DISCLAIMER)?,
        // === Promotional ===
        ComplianceRule::new(
            "promotional.guaranteed_results",
            Promotional,
            High,
            r"(\b100% guaranteed\b|\bguaranteed results\b|\bmoney[- ]back guarantee\b)",
            Suggestion::new("Remove guarantees that cannot be honoured for every pet"),
        )?,
        ComplianceRule::new(
            "promotional.number_one",
            Promotional,
            Medium,
            r"(#1\b|\bnumber one\b)",
            Suggestion::new("Rankings need a cited source").with_replacement("a leading"),
        )?,
        ComplianceRule::new(
            "promotional.miracle",
            Promotional,
            Medium,
            r"\bmiracle\b",
            Suggestion::new("Avoid miracle language").with_replacement("remarkable"),
        )?,
        ComplianceRule::new(
            "promotional.superlative",
            Promotional,
            Low,
            r"\b(best|greatest|unbeatable)\b",
            Suggestion::new("Tone down unverifiable superlatives").with_replacement("excellent"),
        )?,
        ComplianceRule::new(
            "promotional.pressure",
            Promotional,
            Low,
            r"\b(act now|last chance|limited time only)\b",
            Suggestion::new("Avoid high-pressure calls to action").with_replacement("book today"),
        )?
        .only_for(&[ContentCategory::AdCopy, ContentCategory::Email]),
        // === Safety ===
        ComplianceRule::new(
            "safety.toxic_food",
            Safety,
            Critical,
            r"\b(feed|give|share|treat)\b[^.!?]{0,40}\b(chocolate|xylitol|grapes|raisins|onions?)\b",
            Suggestion::new("Never suggest feeding foods that are toxic to pets"),
        )?,
        ComplianceRule::new(
            "safety.dosage_change",
            Safety,
            Critical,
            r"\b(double|triple|increase|extra)( the| your)? (dose|dosage)\b",
            Suggestion::new("Never advise changing medication dosage"),
        )?,
        ComplianceRule::new(
            "safety.absolute_claim",
            Safety,
            High,
            r"(\b100% safe\b|\b(completely|totally|perfectly) safe\b|\bharmless\b|\brisk[- ]free\b|\bno side effects\b)",
            Suggestion::new("No product is safe for every pet; describe safety testing instead"),
        )?,
        ComplianceRule::new(
            "safety.unsupervised",
            Safety,
            Medium,
            r"\b(leave|left) (them |your (dog|cat|pet) )?unattended\b",
            Suggestion::new("Recommend supervision during use"),
        )?,
        // === Legal ===
        ComplianceRule::new(
            "legal.endorsement",
            Legal,
            High,
            r"\b(vet|veterinarian|fda)[- ](approved|endorsed|recommended)\b",
            Suggestion::new("Endorsements need documented substantiation"),
        )?,
        ComplianceRule::new(
            "legal.no_risk",
            Legal,
            Medium,
            r"\bno risk\b",
            Suggestion::new("Avoid absolute risk statements").with_replacement("low risk"),
        )?,
        // === Ethical ===
        ComplianceRule::new(
            "ethical.fear_appeal",
            Ethical,
            High,
            r"(\bbefore it'?s too late\b|\byour (dog|cat|pet) could die\b|\bdon'?t let your (dog|cat|pet) suffer\b)",
            Suggestion::new("Do not use fear about a pet's life to drive sales"),
        )?,
        ComplianceRule::new(
            "ethical.owner_shaming",
            Ethical,
            Medium,
            r"\b(bad|irresponsible|neglectful) (owner|parent)s?\b",
            Suggestion::new("Do not shame pet owners"),
        )?,
    ])
}

/// The built-in rule table
pub fn default_rules() -> Vec<ComplianceRule> {
    DEFAULT_RULES.clone()
}

/// Guidance attached to a validation for each violated category
pub fn recommendation_for(category: ViolationCategory) -> &'static str {
    match category {
        ViolationCategory::Medical => {
            "Avoid definitive health claims and remind readers to consult their veterinarian."
        }
        ViolationCategory::Promotional => {
            "Keep promotional claims modest and verifiable."
        }
        ViolationCategory::Safety => {
            "Include safety guidance and never present a product or food as risk-free."
        }
        ViolationCategory::Legal => {
            "Back endorsements and risk statements with documentation before publishing."
        }
        ViolationCategory::Ethical => {
            "Speak to owners with empathy; avoid fear and guilt as motivators."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str) -> ComplianceRule {
        default_rules()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap()
    }

    #[test]
    fn test_default_rule_ids_unique() {
        let rules = default_rules();
        let mut ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_matched_text_preserves_case() {
        let violation = rule("medical.cure_claim")
            .evaluate("This chew Cures itching.", ContentCategory::SocialPost)
            .unwrap();
        assert_eq!(violation.matched_text.as_deref(), Some("Cures"));
        assert_eq!(violation.severity, Severity::Critical);
    }

    #[test]
    fn test_disclaimer_exempts_rule() {
        let r = rule("medical.missing_disclaimer");
        assert!(r
            .evaluate("Ask about our new allergy treatment.", ContentCategory::Email)
            .is_some());
        assert!(r
            .evaluate(
                "Ask about our new allergy treatment. Always consult your veterinarian.",
                ContentCategory::Email
            )
            .is_none());
    }

    #[test]
    fn test_category_restriction() {
        let r = rule("promotional.pressure");
        assert!(r.evaluate("Act now and save!", ContentCategory::AdCopy).is_some());
        assert!(r.evaluate("Act now and save!", ContentCategory::SocialPost).is_none());
    }

    #[test]
    fn test_toxic_food_needs_feeding_context() {
        let r = rule("safety.toxic_food");
        assert!(r
            .evaluate("Give your pup a little chocolate as a reward!", ContentCategory::SocialPost)
            .is_some());
        assert!(r
            .evaluate("Chocolate is dangerous for dogs.", ContentCategory::SocialPost)
            .is_none());
    }

    #[test]
    fn test_custom_rule() {
        let r = ComplianceRule::new(
            "legal.trademark",
            ViolationCategory::Legal,
            Severity::Low,
            r"\bfurbuddy\b",
            Suggestion::new("Use the registered mark").with_replacement("FurBuddy®"),
        )
        .unwrap();

        let violation = r.evaluate("Meet furbuddy!", ContentCategory::Email).unwrap();
        assert_eq!(violation.correction(), Some(("furbuddy", "FurBuddy®")));
        assert!(ComplianceRule::new("bad", ViolationCategory::Legal, Severity::Low, "(", Suggestion::new("x")).is_err());
    }
}
