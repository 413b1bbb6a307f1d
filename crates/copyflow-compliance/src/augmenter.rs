//! Prompt augmentation for regeneration after critical findings
use crate::violation::{ComplianceViolation, ViolationCategory};
use copyflow_core::GenerationRequest;

const MEDICAL_CLAUSE: &str = "Do not make definitive medical claims such as cures or guaranteed \
health outcomes, and recommend consulting a veterinarian for any health concern.";

const PROMOTIONAL_CLAUSE: &str = "Avoid superlatives, rankings, and guarantees; keep every \
promotional claim modest and verifiable.";

const SAFETY_CLAUSE: &str = "Never describe a product as completely safe or risk-free, never \
suggest feeding foods that are toxic to pets, and include appropriate safety guidance.";

const GENERAL_CLAUSE: &str = "Keep every claim factual and respectful, and do not cite \
endorsements that cannot be substantiated.";

const HEADER: &str = "Compliance requirements:";

pub struct PromptAugmenter;

impl PromptAugmenter {
    /// Build the request for the next attempt.
    ///
    /// The returned request's prompt starts with the original prompt; one
    /// clause is appended per violated category among medical, promotional,
    /// and safety. Findings only in other categories get a general clause.
    /// With no violations the prompt is unchanged.
    pub fn improve(request: &GenerationRequest, violations: &[ComplianceViolation]) -> GenerationRequest {
        if violations.is_empty() {
            return request.clone();
        }

        let mut clauses: Vec<&str> = Self::triggered_categories(violations)
            .into_iter()
            .filter_map(clause_for)
            .collect();
        if clauses.is_empty() {
            clauses.push(GENERAL_CLAUSE);
        }

        let mut prompt = String::from(request.prompt());
        prompt.push_str("\n\n");
        prompt.push_str(HEADER);
        for clause in clauses {
            prompt.push_str("\n- ");
            prompt.push_str(clause);
        }

        request.with_prompt(prompt)
    }

    /// Distinct categories present in `violations`, in category order
    pub fn triggered_categories(violations: &[ComplianceViolation]) -> Vec<ViolationCategory> {
        let mut categories: Vec<ViolationCategory> = violations.iter().map(|v| v.category).collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

fn clause_for(category: ViolationCategory) -> Option<&'static str> {
    match category {
        ViolationCategory::Medical => Some(MEDICAL_CLAUSE),
        ViolationCategory::Promotional => Some(PROMOTIONAL_CLAUSE),
        ViolationCategory::Safety => Some(SAFETY_CLAUSE),
        ViolationCategory::Legal | ViolationCategory::Ethical => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::{Severity, Suggestion};
    use copyflow_core::ContentCategory;

    fn violation(category: ViolationCategory) -> ComplianceViolation {
        ComplianceViolation::new("test.rule", category, Severity::Critical, Suggestion::new("fix"))
    }

    #[test]
    fn test_one_clause_per_category() {
        let request = GenerationRequest::new("Promote our joint chews", ContentCategory::AdCopy);
        let improved = PromptAugmenter::improve(
            &request,
            &[
                violation(ViolationCategory::Medical),
                violation(ViolationCategory::Medical),
                violation(ViolationCategory::Safety),
            ],
        );

        assert!(improved.prompt().starts_with("Promote our joint chews"));
        assert_eq!(improved.prompt().matches(MEDICAL_CLAUSE).count(), 1);
        assert!(improved.prompt().contains(SAFETY_CLAUSE));
        assert!(!improved.prompt().contains(PROMOTIONAL_CLAUSE));
        assert_eq!(improved.id(), request.id());
    }

    #[test]
    fn test_original_untouched() {
        let request = GenerationRequest::new("Spring newsletter", ContentCategory::Email);
        let before = request.clone();
        let improved = PromptAugmenter::improve(&request, &[violation(ViolationCategory::Promotional)]);

        assert_eq!(request, before);
        assert!(improved.prompt().len() > request.prompt().len());
    }

    #[test]
    fn test_other_categories_get_general_clause() {
        let request = GenerationRequest::new("Clinic launch", ContentCategory::LandingPage);
        let improved = PromptAugmenter::improve(&request, &[violation(ViolationCategory::Legal)]);
        assert!(improved.prompt().ends_with(GENERAL_CLAUSE));
    }

    #[test]
    fn test_no_violations_no_change() {
        let request = GenerationRequest::new("Clinic launch", ContentCategory::LandingPage);
        assert_eq!(PromptAugmenter::improve(&request, &[]), request);
    }
}
