use shared_models::clinical::UrgencyLevel;

use super::catalogue::profile;
use crate::models::{ActionPlan, ActionStep, SymptomAssessment};

const MAX_WARNING_SIGNS: usize = 8;

pub const DISCLAIMER: &str = "This plan is general guidance and does not replace advice from a \
healthcare professional. If you feel worse at any point, seek care sooner.";

/// Three-day self-management plan, or one immediate step when the
/// assessment calls for immediate care.
pub fn action_plan(assessment: &SymptomAssessment) -> ActionPlan {
    let level = assessment.urgency.level;
    let warning_signs = warning_signs(assessment);

    let steps = if level.requires_immediate_care() {
        vec![ActionStep {
            day: 0,
            title: "Get care now".to_string(),
            actions: vec![
                level.care_advice().to_string(),
                "Do not drive yourself; ask someone to take you or call for help".to_string(),
                "Bring a list of your medications and allergies".to_string(),
            ],
        }]
    } else {
        let names: Vec<&str> = assessment
            .active_symptoms()
            .map(|m| m.category.display_name())
            .collect();
        let tracked = if names.is_empty() { "your symptoms".to_string() } else { names.join(", ") };
        let mut day_one = vec!["Rest and drink plenty of fluids".to_string()];
        day_one.extend(
            assessment
                .active_symptoms()
                .filter_map(|m| profile(m.category).relief.first())
                .map(|m| m.to_string()),
        );
        day_one.push(format!("Write down how {tracked} feel morning and evening"));

        let mut day_three = vec![
            "If you are not improving, book an appointment with a healthcare provider".to_string(),
        ];
        if level >= UrgencyLevel::Urgent {
            day_three.insert(0, level.care_advice().to_string());
        }

        vec![
            ActionStep { day: 1, title: "Rest and monitor".to_string(), actions: day_one },
            ActionStep {
                day: 2,
                title: "Reassess".to_string(),
                actions: vec![
                    "Compare your symptoms with yesterday".to_string(),
                    "Re-rate any pain on a scale of 0 to 10".to_string(),
                    "Continue the measures that helped".to_string(),
                ],
            },
            ActionStep { day: 3, title: "Escalate if not improving".to_string(), actions: day_three },
        ]
    };

    ActionPlan {
        urgency: level,
        steps,
        warning_signs,
        follow_up_hours: level.follow_up_hours(),
        disclaimer: DISCLAIMER.to_string(),
    }
}

fn warning_signs(assessment: &SymptomAssessment) -> Vec<String> {
    let mut signs: Vec<String> = Vec::new();
    let phrases = assessment
        .active_symptoms()
        .flat_map(|m| profile(m.category).red_flags.iter().map(|(p, _)| *p));
    for phrase in phrases.chain(["difficulty breathing", "confusion or fainting"]) {
        if signs.len() == MAX_WARNING_SIGNS {
            break;
        }
        if !signs.iter().any(|s| s == phrase) {
            signs.push(phrase.to_string());
        }
    }
    signs
}
