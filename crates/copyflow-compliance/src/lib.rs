//! Copyflow Compliance: Validation, Correction, and Prompt Augmentation
//!
//! Scans generated marketing copy against a fixed table of pattern rules and
//! turns the findings into something the workflow can act on.
//!
//! # Architecture
//!
//! ```text
//! Text + Category → Rule Table → Violations → ComplianceValidation
//!                                    ↓
//!                 ┌──────────────────┴──────────────────┐
//!                 ↓                                     ↓
//!        low/medium + replacement                 critical present
//!                 ↓                                     ↓
//!           AutoCorrector                        PromptAugmenter
//!          (patched text)                      (new request value)
//! ```
//!
//! # Example
//!
//! ```
//! use copyflow_compliance::{AutoCorrector, ComplianceValidator};
//! use copyflow_core::ContentCategory;
//!
//! let validator = ComplianceValidator::new();
//! let text = "The best grooming in town for your pup!";
//! let validation = validator.validate(text, ContentCategory::SocialPost);
//!
//! assert!(!validation.is_compliant());
//! assert_eq!(validation.critical_count(), 0);
//!
//! let fixed = AutoCorrector::apply_suggestions(text, validation.violations());
//! assert_eq!(fixed, "The excellent grooming in town for your pup!");
//! ```

pub mod augmenter;
pub mod corrector;
pub mod rule;
pub mod validator;
pub mod violation;

pub use augmenter::PromptAugmenter;
pub use corrector::AutoCorrector;
pub use rule::{default_rules, ComplianceRule};
pub use validator::ComplianceValidator;
pub use violation::{
    ComplianceValidation, ComplianceViolation, Severity, Suggestion, ViolationCategory,
};

use copyflow_core::ContentCategory;

/// Validate with the built-in rule table
pub fn validate(text: &str, category: ContentCategory) -> ComplianceValidation {
    ComplianceValidator::new().validate(text, category)
}

/// Check if text passes the built-in rule table without any violation
pub fn is_compliant(text: &str, category: ContentCategory) -> bool {
    validate(text, category).is_compliant()
}
