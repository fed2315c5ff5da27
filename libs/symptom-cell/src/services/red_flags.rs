use shared_models::clinical::Severity;
use shared_utils::text::{contains_phrase, tokenize};

use super::catalogue::{profile, GENERAL_RED_FLAGS, SEVERE_IS_URGENT};
use super::extraction::is_negated;
use crate::models::{RedFlag, RedFlagLevel, SymptomMention};

/// Finds warning phrases in the text. Category-specific flags only apply when
/// that category was mentioned and not negated.
pub fn detect_red_flags(text: &str, mentions: &[SymptomMention]) -> Vec<RedFlag> {
    let tokens = tokenize(text).join(" ");
    let present = |phrase: &str| contains_phrase(&tokens, phrase) && !is_negated(&tokens, phrase);
    let mut flags: Vec<RedFlag> = Vec::new();
    let mut push = |flag: RedFlag| {
        if !flags.iter().any(|f| f.phrase == flag.phrase) {
            flags.push(flag);
        }
    };

    for (phrase, level) in GENERAL_RED_FLAGS {
        if present(phrase) {
            push(RedFlag { phrase: phrase.to_string(), level: *level, category: None });
        }
    }

    for mention in mentions.iter().filter(|m| !m.negated) {
        for (phrase, level) in profile(mention.category).red_flags {
            if present(phrase) {
                push(RedFlag {
                    phrase: phrase.to_string(),
                    level: *level,
                    category: Some(mention.category),
                });
            }
        }
        if mention.severity == Severity::Severe && SEVERE_IS_URGENT.contains(&mention.category) {
            push(RedFlag {
                phrase: format!("severe {}", mention.category.display_name()),
                level: RedFlagLevel::Urgent,
                category: Some(mention.category),
            });
        }
    }

    flags.sort_by(|a, b| b.level.cmp(&a.level));
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SymptomCategory;
    use crate::services::extraction::extract_symptoms;

    fn flags_for(text: &str) -> Vec<RedFlag> {
        detect_red_flags(text, &extract_symptoms(text))
    }

    #[test]
    fn test_general_emergency_phrase() {
        let flags = flags_for("My father is unconscious");
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].level, RedFlagLevel::Emergency);
        assert!(flags[0].category.is_none());
    }

    #[test]
    fn test_category_flag_requires_mention() {
        let flags = flags_for("crushing chest pain spreading to my arm");
        assert!(flags.iter().any(|f| f.phrase == "crushing" && f.category == Some(SymptomCategory::ChestPain)));
        assert!(flags.iter().all(|f| f.level == RedFlagLevel::Emergency || f.phrase.starts_with("severe")));
        assert!(flags_for("a crushing weight of work").is_empty());
    }

    #[test]
    fn test_severe_chest_pain_is_urgent() {
        let flags = flags_for("severe chest pain");
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].phrase, "severe chest pain");
        assert_eq!(flags[0].level, RedFlagLevel::Urgent);
    }

    #[test]
    fn test_negated_flag_is_ignored() {
        assert!(flags_for("headache but no stiff neck").is_empty());
    }

    #[test]
    fn test_flag_affirmed_after_denial_is_kept() {
        let flags = flags_for("I have a headache and a fever but no stiff neck. Now I have a stiff neck.");
        assert!(flags.iter().any(|f| f.phrase == "stiff neck" && f.level == RedFlagLevel::Urgent));

        let flags = flags_for(
            "I have a cough but I am not coughing up blood. Today I'm coughing up blood and I can't breathe",
        );
        let phrases: Vec<&str> = flags.iter().map(|f| f.phrase.as_str()).collect();
        assert!(phrases.contains(&"coughing up blood"));
        assert!(phrases.contains(&"cant breathe"));
    }

    #[test]
    fn test_emergencies_sort_first() {
        let flags = flags_for("I fainted and now I can't breathe");
        assert_eq!(flags[0].level, RedFlagLevel::Emergency);
        assert_eq!(flags.last().map(|f| f.level), Some(RedFlagLevel::Urgent));
    }
}
