use shared_models::clinical::{PatientContext, UrgencyLevel};

use super::catalogue::profile;
use crate::models::{
    RedFlag, RedFlagLevel, SymptomDuration, SymptomMention, SymptomRelationship, UrgencyAssessment,
};

/// Divides the raw weighted symptom sum so that one severe high-weight
/// symptom lands in the moderate band by itself.
const NORMALISER: f64 = 3.0;
const STRONG_RELATIONSHIP_BONUS: f64 = 0.15;
const AGE_BONUS: f64 = 0.1;
const CHRONIC_BONUS: f64 = 0.05;
const CHRONIC_BONUS_CAP: f64 = 0.15;

/// Longer-lasting symptoms weigh more.
pub fn duration_factor(duration: Option<&SymptomDuration>) -> f64 {
    match duration.map(|d| d.hours) {
        None => 1.0,
        Some(h) if h <= 24.0 => 1.0,
        Some(h) if h <= 72.0 => 1.1,
        Some(h) if h <= 168.0 => 1.2,
        Some(_) => 1.3,
    }
}

pub fn score_urgency(
    mentions: &[SymptomMention],
    relationships: &[SymptomRelationship],
    red_flags: &[RedFlag],
    patient: &PatientContext,
) -> UrgencyAssessment {
    let mut factors = Vec::new();
    let active: Vec<&SymptomMention> = mentions.iter().filter(|m| !m.negated).collect();

    let mut raw = 0.0;
    for mention in &active {
        let contribution = profile(mention.category).base_weight
            * mention.severity.weight()
            * duration_factor(mention.duration.as_ref());
        raw += contribution;
        factors.push(format!(
            "{} ({:?}){}",
            mention.category.display_name(),
            mention.severity,
            mention
                .duration
                .as_ref()
                .map(|d| format!(", {}", d.text))
                .unwrap_or_default()
        ));
    }
    let mut score = raw / NORMALISER;

    for relationship in relationships.iter().filter(|r| r.is_strong()) {
        score += STRONG_RELATIONSHIP_BONUS;
        factors.push(format!("pattern: {}", relationship.pattern));
    }

    if !active.is_empty() {
        if let Some(age) = patient.age {
            if age >= 65 || age < 2 {
                score += AGE_BONUS;
                factors.push(format!("age {age}"));
            }
        }
        if !patient.chronic_conditions.is_empty() {
            let bonus = (CHRONIC_BONUS * patient.chronic_conditions.len() as f64).min(CHRONIC_BONUS_CAP);
            score += bonus;
            factors.push(format!("chronic conditions: {}", patient.chronic_conditions.join(", ")));
        }
    }

    let score = score.clamp(0.0, 1.0);
    let mut level = UrgencyLevel::from_score(score);
    for flag in red_flags {
        factors.push(format!("red flag: {}", flag.phrase));
    }
    if let Some(worst) = red_flags.iter().map(|f| f.level).max() {
        level = match worst {
            RedFlagLevel::Emergency => UrgencyLevel::Emergency,
            RedFlagLevel::Urgent => level.max(UrgencyLevel::Urgent),
        };
    }

    UrgencyAssessment { score, level, factors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::extraction::extract_symptoms;
    use crate::services::red_flags::detect_red_flags;
    use crate::services::relationships::map_relationships;

    fn score(text: &str, patient: &PatientContext) -> UrgencyAssessment {
        let mentions = extract_symptoms(text);
        let relationships = map_relationships(&mentions, text);
        let flags = detect_red_flags(text, &mentions);
        score_urgency(&mentions, &relationships, &flags, patient)
    }

    #[test]
    fn test_mild_single_symptom_is_routine() {
        let result = score("a mild headache", &PatientContext::default());
        // 0.4 * 0.3 / 3
        assert!((result.score - 0.04).abs() < 1e-9);
        assert_eq!(result.level, UrgencyLevel::Routine);
    }

    #[test]
    fn test_no_symptoms_scores_zero_even_for_elderly() {
        let patient = PatientContext { age: Some(80), ..Default::default() };
        let result = score("hello", &patient);
        assert_eq!(result.score, 0.0);
        assert!(result.factors.is_empty());
    }

    #[test]
    fn test_cold_cluster_adds_relationship_bonus() {
        let result = score("fever, cough and a sore throat", &PatientContext::default());
        // (0.5 + 0.35 + 0.25) * 0.6 / 3 + 0.15
        assert!((result.score - 0.37).abs() < 1e-9);
        assert_eq!(result.level, UrgencyLevel::Moderate);
        assert!(result.factors.iter().any(|f| f == "pattern: respiratory_infection"));
    }

    #[test]
    fn test_risk_modifiers() {
        let patient = PatientContext {
            age: Some(70),
            chronic_conditions: vec!["diabetes".into(), "copd".into(), "ckd".into(), "hypertension".into()],
            ..Default::default()
        };
        let base = score("a mild headache", &PatientContext::default()).score;
        let with_risk = score("a mild headache", &patient).score;
        assert!((with_risk - base - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_emergency_red_flag_forces_emergency() {
        let result = score("mild cough and I can't breathe", &PatientContext::default());
        assert!(result.score < 0.85);
        assert_eq!(result.level, UrgencyLevel::Emergency);
    }

    #[test]
    fn test_urgent_red_flag_floors_level() {
        let result = score("slight cough, coughing up blood", &PatientContext::default());
        assert_eq!(result.level, UrgencyLevel::Urgent);
    }

    #[test]
    fn test_score_is_clamped() {
        let text = "severe crushing chest pain, severe shortness of breath, severe abdominal pain, \
                    high fever, I'm dizzy and vomiting for 2 weeks";
        let patient = PatientContext { age: Some(90), ..Default::default() };
        assert_eq!(score(text, &patient).score, 1.0);
    }
}
