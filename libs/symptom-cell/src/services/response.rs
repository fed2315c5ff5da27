use tracing::instrument;

use shared_models::clinical::{PatientContext, UrgencyLevel};

use super::catalogue::profile;
use super::engine::SymptomAssessmentEngine;
use crate::models::{MedicalResponse, SymptomAssessment, SymptomError};

const MAX_WATCH_ITEMS: usize = 6;

/// Turns a free-text description into a patient-facing reply with protocol
/// follow-up questions, red flags and urgency.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedicalResponseGenerator {
    engine: SymptomAssessmentEngine,
}

impl MedicalResponseGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip_all)]
    pub fn generate_response(
        &self,
        text: &str,
        patient: &PatientContext,
    ) -> Result<MedicalResponse, SymptomError> {
        let assessment = self.engine.assess_with_asked(text, patient, &[])?;
        Ok(response_from(assessment))
    }
}

pub fn response_from(assessment: SymptomAssessment) -> MedicalResponse {
    let summary = summarize(&assessment);
    let mut red_flags_to_watch: Vec<String> = Vec::new();
    for mention in assessment.active_symptoms() {
        for (phrase, _) in profile(mention.category).red_flags {
            if red_flags_to_watch.len() < MAX_WATCH_ITEMS && !red_flags_to_watch.iter().any(|p| p == phrase) {
                red_flags_to_watch.push(phrase.to_string());
            }
        }
    }

    MedicalResponse {
        summary,
        care_advice: assessment.urgency.level.care_advice().to_string(),
        symptoms: assessment.symptoms,
        relationships: assessment.relationships,
        follow_up_questions: assessment.follow_up_questions,
        red_flags_detected: assessment.red_flags,
        red_flags_to_watch,
        urgency: assessment.urgency,
    }
}

pub fn summarize(assessment: &SymptomAssessment) -> String {
    let names: Vec<&str> = assessment
        .active_symptoms()
        .map(|m| m.category.display_name())
        .collect();
    if names.is_empty() {
        return "I couldn't pick out specific symptoms yet. Could you tell me more about how you're feeling?"
            .to_string();
    }

    let level = assessment.urgency.level;
    let mut summary = format!("You mentioned {}.", join_names(&names));
    if let Some(pattern) = assessment.relationships.iter().find(|r| r.is_strong()) {
        summary.push(' ');
        summary.push_str(&pattern.description);
        summary.push('.');
    }
    match level {
        UrgencyLevel::Emergency | UrgencyLevel::Critical => {
            summary.push_str(" Some of what you describe needs immediate attention. ");
        }
        UrgencyLevel::Urgent => summary.push_str(" This should be checked soon. "),
        UrgencyLevel::Moderate | UrgencyLevel::Routine => summary.push(' '),
    }
    summary.push_str(level.care_advice());
    summary
}

fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_lists_symptoms_and_watch_items() {
        let response = MedicalResponseGenerator::new()
            .generate_response("I have a headache and a fever", &PatientContext::default())
            .unwrap();
        assert!(response.summary.starts_with("You mentioned headache and fever."));
        assert!(response.red_flags_to_watch.contains(&"stiff neck".to_string()));
        assert!(response.red_flags_to_watch.len() <= MAX_WATCH_ITEMS);
        assert!(response.follow_up_questions.len() <= 5);
        assert!(!response.follow_up_questions.is_empty());
    }

    #[test]
    fn test_emergency_summary() {
        let response = MedicalResponseGenerator::new()
            .generate_response("crushing chest pain", &PatientContext::default())
            .unwrap();
        assert_eq!(response.urgency.level, UrgencyLevel::Emergency);
        assert!(response.summary.contains("immediate attention"));
        assert_eq!(response.care_advice, UrgencyLevel::Emergency.care_advice());
    }

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(&["a"]), "a");
        assert_eq!(join_names(&["a", "b", "c"]), "a, b and c");
    }
}
