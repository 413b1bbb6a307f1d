//! Automatic correction of non-critical findings
//!
//! Applies the literal replacements attached to low and medium severity
//! violations. High and critical findings are left for a regeneration.

use crate::violation::ComplianceViolation;
use regex::{NoExpand, Regex};

pub struct AutoCorrector;

impl AutoCorrector {
    /// Substitute every correctable violation's matched text.
    ///
    /// Every whole-word occurrence of a matched phrase is replaced, and passes
    /// repeat until the text stops changing, so running the result through
    /// again with the same violations is a no-op. Occurrences inside longer
    /// words are left alone ("best" never rewrites "bestselling"). A
    /// replacement that contains its own matched text is skipped.
    pub fn apply_suggestions(text: &str, violations: &[ComplianceViolation]) -> String {
        let corrections: Vec<(Regex, &str)> = violations
            .iter()
            .filter_map(|v| v.correction())
            .filter(|(matched, replacement)| !replacement.contains(matched))
            .filter_map(|(matched, replacement)| Some((phrase_pattern(matched)?, replacement)))
            .collect();

        let mut current = text.to_string();
        if corrections.is_empty() {
            return current;
        }

        // Chained corrections (a → b, b → c) settle within one pass per link.
        for _ in 0..=corrections.len() {
            let next = corrections
                .iter()
                .fold(current.clone(), |acc, (pattern, replacement)| {
                    pattern.replace_all(&acc, NoExpand(*replacement)).into_owned()
                });
            if next == current {
                break;
            }
            current = next;
        }

        current
    }

    /// Count of violations this corrector would act on
    pub fn correctable_count(violations: &[ComplianceViolation]) -> usize {
        violations.iter().filter(|v| v.correction().is_some()).count()
    }
}

/// Literal pattern for `phrase`, anchored on word boundaries at any end that
/// is a word character. `#1` must still match after a space.
fn phrase_pattern(phrase: &str) -> Option<Regex> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let first = phrase.chars().next()?;
    let last = phrase.chars().last()?;

    let mut pattern = String::new();
    if is_word(first) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(phrase));
    if is_word(last) {
        pattern.push_str(r"\b");
    }
    Regex::new(&pattern).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::{Severity, Suggestion, ViolationCategory};

    fn violation(severity: Severity, matched: &str, replacement: Option<&str>) -> ComplianceViolation {
        let mut suggestion = Suggestion::new("fix it");
        if let Some(r) = replacement {
            suggestion = suggestion.with_replacement(r);
        }
        ComplianceViolation::new("test.rule", ViolationCategory::Promotional, severity, suggestion)
            .with_matched_text(matched)
    }

    #[test]
    fn test_replaces_low_and_medium() {
        let violations = vec![
            violation(Severity::Low, "best", Some("excellent")),
            violation(Severity::Medium, "miracle", Some("remarkable")),
        ];
        let fixed = AutoCorrector::apply_suggestions("The best miracle shampoo", &violations);
        assert_eq!(fixed, "The excellent remarkable shampoo");
    }

    #[test]
    fn test_leaves_high_and_critical() {
        let violations = vec![
            violation(Severity::High, "harmless", Some("gentle")),
            violation(Severity::Critical, "cures", Some("helps")),
        ];
        let text = "A harmless formula that cures itching";
        assert_eq!(AutoCorrector::apply_suggestions(text, &violations), text);
        assert_eq!(AutoCorrector::correctable_count(&violations), 0);
    }

    #[test]
    fn test_without_replacement_is_untouched() {
        let violations = vec![violation(Severity::Medium, "bad owners", None)];
        let text = "Only bad owners skip grooming";
        assert_eq!(AutoCorrector::apply_suggestions(text, &violations), text);
    }

    #[test]
    fn test_idempotent_with_repeated_phrase() {
        let violations = vec![violation(Severity::Low, "best", Some("excellent"))];
        let once = AutoCorrector::apply_suggestions("best food, best price", &violations);
        let twice = AutoCorrector::apply_suggestions(&once, &violations);
        assert_eq!(once, "excellent food, excellent price");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_idempotent_with_chained_corrections() {
        let violations = vec![
            violation(Severity::Low, "great", Some("good")),
            violation(Severity::Low, "superb", Some("great")),
        ];
        let once = AutoCorrector::apply_suggestions("a superb groom", &violations);
        let twice = AutoCorrector::apply_suggestions(&once, &violations);
        assert_eq!(once, "a good groom");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_longer_words_are_left_alone() {
        let violations = vec![violation(Severity::Low, "best", Some("excellent"))];
        let fixed = AutoCorrector::apply_suggestions("Our bestselling shampoo is the best choice.", &violations);
        assert_eq!(fixed, "Our bestselling shampoo is the excellent choice.");
    }

    #[test]
    fn test_symbol_phrase_still_replaced() {
        let violations = vec![violation(Severity::Medium, "#1", Some("a leading"))];
        let fixed = AutoCorrector::apply_suggestions("The #1 groomer, #10 on the list", &violations);
        assert_eq!(fixed, "The a leading groomer, #10 on the list");
    }

    #[test]
    fn test_self_containing_replacement_skipped() {
        let violations = vec![violation(Severity::Low, "best", Some("best-in-class"))];
        let text = "best care";
        assert_eq!(AutoCorrector::apply_suggestions(text, &violations), text);
    }
}
