//! Violation and validation result types
//!
//! Provides the structured output of a compliance scan.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy area a violation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationCategory {
    Medical,
    Promotional,
    Safety,
    Legal,
    Ethical,
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViolationCategory::Medical => write!(f, "medical"),
            ViolationCategory::Promotional => write!(f, "promotional"),
            ViolationCategory::Safety => write!(f, "safety"),
            ViolationCategory::Legal => write!(f, "legal"),
            ViolationCategory::Ethical => write!(f, "ethical"),
        }
    }
}

/// Severity of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

impl Severity {
    /// Low and medium findings may be patched in place
    pub fn is_correctable(&self) -> bool {
        matches!(self, Severity::Low | Severity::Medium)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// How to fix a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub description: String,
    /// Literal text to substitute for the matched text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl Suggestion {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            replacement: None,
        }
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

/// A single compliance finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceViolation {
    /// The rule that fired
    pub rule_id: String,
    pub category: ViolationCategory,
    pub severity: Severity,
    /// Substring of the scanned text that triggered the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
    pub suggestion: Suggestion,
}

impl ComplianceViolation {
    pub fn new(
        rule_id: impl Into<String>,
        category: ViolationCategory,
        severity: Severity,
        suggestion: Suggestion,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            category,
            severity,
            matched_text: None,
            suggestion,
        }
    }

    pub fn with_matched_text(mut self, matched: impl Into<String>) -> Self {
        self.matched_text = Some(matched.into());
        self
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// The (matched, replacement) pair when this finding can be patched in place
    pub fn correction(&self) -> Option<(&str, &str)> {
        if !self.severity.is_correctable() {
            return None;
        }
        let matched = self.matched_text.as_deref().filter(|m| !m.is_empty())?;
        let replacement = self.suggestion.replacement.as_deref()?;
        Some((matched, replacement))
    }
}

/// Result of validating one piece of text.
///
/// Only [`crate::ComplianceValidator`] builds these, so `is_compliant` always
/// agrees with the violation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceValidation {
    is_compliant: bool,
    violations: Vec<ComplianceViolation>,
    confidence_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    approved_content: Option<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

impl ComplianceValidation {
    pub(crate) fn new(
        text: &str,
        violations: Vec<ComplianceViolation>,
        confidence_score: f32,
        recommendations: Vec<String>,
    ) -> Self {
        let is_compliant = violations.is_empty();
        Self {
            is_compliant,
            approved_content: is_compliant.then(|| text.to_string()),
            violations,
            confidence_score,
            recommendations,
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.is_compliant
    }

    /// Findings in detection order
    pub fn violations(&self) -> &[ComplianceViolation] {
        &self.violations
    }

    pub fn confidence_score(&self) -> f32 {
        self.confidence_score
    }

    pub fn approved_content(&self) -> Option<&str> {
        self.approved_content.as_deref()
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn critical_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_critical()).count()
    }

    pub fn has_critical(&self) -> bool {
        self.violations.iter().any(|v| v.is_critical())
    }

    /// Highest severity found, if any
    pub fn max_severity(&self) -> Option<Severity> {
        self.violations.iter().map(|v| v.severity).max()
    }
}
