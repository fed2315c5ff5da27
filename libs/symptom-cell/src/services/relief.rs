use shared_models::clinical::UrgencyLevel;

use super::catalogue::profile;
use crate::models::{ReliefKind, ReliefRecommendation, SymptomAssessment};

/// Non-drug relief measures per active symptom. At `Urgent` and above only
/// the advice to seek care is returned.
pub fn recommend_relief(assessment: &SymptomAssessment) -> Vec<ReliefRecommendation> {
    let level = assessment.urgency.level;
    if level >= UrgencyLevel::Urgent {
        return vec![ReliefRecommendation {
            kind: ReliefKind::SeekCare,
            category: None,
            title: "Seek medical care".to_string(),
            measures: vec![level.care_advice().to_string()],
        }];
    }

    let mut recommendations: Vec<ReliefRecommendation> = assessment
        .active_symptoms()
        .map(|mention| ReliefRecommendation {
            kind: ReliefKind::SelfCare,
            category: Some(mention.category),
            title: format!("Easing your {}", mention.category.display_name()),
            measures: profile(mention.category)
                .relief
                .iter()
                .map(|m| m.to_string())
                .collect(),
        })
        .collect();

    recommendations.push(ReliefRecommendation {
        kind: ReliefKind::SelfCare,
        category: None,
        title: "General care".to_string(),
        measures: vec![
            "Rest and stay well hydrated".to_string(),
            "Keep a note of how your symptoms change".to_string(),
            level.care_advice().to_string(),
        ],
    });
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SymptomAssessmentRequest;
    use crate::services::SymptomAssessmentEngine;

    fn assess(text: &str) -> SymptomAssessment {
        SymptomAssessmentEngine::new()
            .assess(&SymptomAssessmentRequest { description: text.into(), patient: Default::default() })
            .unwrap()
    }

    #[test]
    fn test_self_care_per_symptom() {
        let relief = recommend_relief(&assess("mild sore throat and a cough"));
        assert_eq!(relief.len(), 3);
        assert!(relief.iter().all(|r| r.kind == ReliefKind::SelfCare));
        assert!(relief.iter().flat_map(|r| &r.measures).any(|m| m.contains("honey")));
    }

    #[test]
    fn test_urgent_suppresses_self_care() {
        let relief = recommend_relief(&assess("severe abdominal pain"));
        assert_eq!(relief.len(), 1);
        assert_eq!(relief[0].kind, ReliefKind::SeekCare);
    }
}
