use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use shared_models::clinical::PatientContext;

use super::catalogue::profile;
use super::extraction::extract_symptoms;
use super::red_flags::detect_red_flags;
use super::relationships::{map_relationships, pattern_conditions};
use super::urgency::score_urgency;
use crate::models::{
    QuestionTopic, SymptomAssessment, SymptomAssessmentRequest, SymptomError, SymptomMention,
};

pub const MAX_DESCRIPTION_CHARS: usize = 5000;
pub const MAX_FOLLOW_UP_QUESTIONS: usize = 5;
const MAX_QUESTIONS_PER_CATEGORY: usize = 3;
const MAX_CONDITIONS: usize = 6;

const GENERIC_QUESTIONS: &[&str] = &[
    "Could you describe your main symptom in a little more detail?",
    "When did it start?",
    "On a scale of 0 to 10, how much is it bothering you?",
];

/// Runs extraction, relationship mapping, red-flag detection and urgency
/// scoring over one description.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymptomAssessmentEngine;

impl SymptomAssessmentEngine {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all)]
    pub fn assess(&self, request: &SymptomAssessmentRequest) -> Result<SymptomAssessment, SymptomError> {
        self.assess_with_asked(&request.description, &request.patient, &[])
    }

    /// Like `assess`, but leaves out follow-up questions already asked.
    pub fn assess_with_asked(
        &self,
        description: &str,
        patient: &PatientContext,
        asked: &[String],
    ) -> Result<SymptomAssessment, SymptomError> {
        validate(description)?;

        let symptoms = extract_symptoms(description);
        let relationships = map_relationships(&symptoms, description);
        let red_flags = detect_red_flags(description, &symptoms);
        let urgency = score_urgency(&symptoms, &relationships, &red_flags, patient);
        debug!(
            symptoms = symptoms.len(),
            red_flags = red_flags.len(),
            score = urgency.score,
            level = %urgency.level,
            "Symptoms assessed"
        );

        let mut possible_conditions: Vec<String> = Vec::new();
        let from_patterns = relationships
            .iter()
            .flat_map(|r| pattern_conditions(&r.pattern).iter());
        let from_categories = by_weight(&symptoms)
            .into_iter()
            .flat_map(|m| profile(m.category).related_conditions.iter());
        for condition in from_patterns.chain(from_categories) {
            if possible_conditions.len() == MAX_CONDITIONS {
                break;
            }
            if !possible_conditions.iter().any(|c| c == condition) {
                possible_conditions.push(condition.to_string());
            }
        }

        Ok(SymptomAssessment {
            id: Uuid::new_v4(),
            follow_up_questions: follow_up_questions(&symptoms, asked),
            symptoms,
            relationships,
            red_flags,
            urgency,
            possible_conditions,
            created_at: Utc::now(),
        })
    }
}

pub fn validate(description: &str) -> Result<(), SymptomError> {
    if description.trim().is_empty() {
        return Err(SymptomError::EmptyDescription);
    }
    let chars = description.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(SymptomError::DescriptionTooLong(chars, MAX_DESCRIPTION_CHARS));
    }
    Ok(())
}

/// Active mentions, highest base weight first.
fn by_weight(mentions: &[SymptomMention]) -> Vec<&SymptomMention> {
    let mut active: Vec<&SymptomMention> = mentions.iter().filter(|m| !m.negated).collect();
    active.sort_by(|a, b| {
        profile(b.category)
            .base_weight
            .total_cmp(&profile(a.category).base_weight)
    });
    active
}

/// Protocol questions for the mentioned categories, skipping topics the
/// patient already covered and questions already asked.
pub fn follow_up_questions(mentions: &[SymptomMention], asked: &[String]) -> Vec<String> {
    let active = by_weight(mentions);
    let mut questions: Vec<String> = Vec::new();

    if active.is_empty() {
        questions.extend(
            GENERIC_QUESTIONS
                .iter()
                .filter(|q| !asked.iter().any(|a| a == *q))
                .map(|q| q.to_string()),
        );
        return questions;
    }

    for mention in active {
        let answered = |topic: QuestionTopic| match topic {
            QuestionTopic::Onset => mention.duration.is_some(),
            QuestionTopic::Severity => mention.pain_scale.is_some(),
            QuestionTopic::Location => mention.location.is_some(),
            _ => false,
        };
        let fresh = profile(mention.category)
            .questions
            .iter()
            .filter(|(topic, _)| !answered(*topic))
            .map(|(_, q)| *q)
            .filter(|q| !asked.iter().any(|a| a == q) && !questions.iter().any(|existing| existing == q))
            .take(MAX_QUESTIONS_PER_CATEGORY)
            .collect::<Vec<_>>();
        for question in fresh {
            if questions.len() == MAX_FOLLOW_UP_QUESTIONS {
                return questions;
            }
            questions.push(question.to_string());
        }
    }
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::clinical::UrgencyLevel;

    fn request(text: &str) -> SymptomAssessmentRequest {
        SymptomAssessmentRequest { description: text.to_string(), patient: PatientContext::default() }
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let engine = SymptomAssessmentEngine::new();
        assert_matches!(engine.assess(&request("  \n")), Err(SymptomError::EmptyDescription));
        assert_matches!(
            engine.assess(&request(&"x".repeat(MAX_DESCRIPTION_CHARS + 1))),
            Err(SymptomError::DescriptionTooLong(..))
        );
    }

    #[test]
    fn test_assessment_combines_pipeline() {
        let engine = SymptomAssessmentEngine::new();
        let assessment = engine
            .assess(&request("Chest pain and shortness of breath since this morning"))
            .unwrap();
        assert_eq!(assessment.symptoms.len(), 2);
        assert!(assessment.relationships.iter().any(|r| r.pattern == "cardiopulmonary" && r.is_strong()));
        assert!(assessment.urgency.level >= UrgencyLevel::Urgent);
        assert_eq!(assessment.possible_conditions[0], "acute coronary syndrome");
        assert!(assessment.possible_conditions.len() <= MAX_CONDITIONS);
    }

    #[test]
    fn test_questions_are_capped_and_ordered_by_weight() {
        let mentions = extract_symptoms("headache, fever, cough, fatigue and joint pain");
        let questions = follow_up_questions(&mentions, &[]);
        assert_eq!(questions.len(), MAX_FOLLOW_UP_QUESTIONS);
        // fever outweighs headache
        assert_eq!(questions[0], "How long have you had the fever?");
    }

    #[test]
    fn test_answered_topics_and_asked_questions_are_skipped() {
        let mentions = extract_symptoms("headache for 2 days, 6/10");
        let asked = vec!["Where exactly is the pain: forehead, temples, one side, or the back of the head?".to_string()];
        let questions = follow_up_questions(&mentions, &asked);
        assert_eq!(
            questions,
            vec![
                "Do you have any vision changes, sensitivity to light, or a stiff neck?".to_string(),
                "Have you had headaches like this before?".to_string(),
            ]
        );
    }

    #[test]
    fn test_generic_questions_without_symptoms() {
        let questions = follow_up_questions(&[], &[]);
        assert_eq!(questions.len(), GENERIC_QUESTIONS.len());
    }
}
