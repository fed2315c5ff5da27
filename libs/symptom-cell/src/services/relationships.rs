use shared_utils::text::{contains_phrase, tokenize};

use crate::models::{SymptomCategory, SymptomMention, SymptomRelationship};

use SymptomCategory::*;

struct ClusterRule {
    pattern: &'static str,
    description: &'static str,
    categories: &'static [SymptomCategory],
    /// Extra phrase that counts as one more required element.
    cue: Option<&'static str>,
    conditions: &'static [&'static str],
}

static CLUSTER_RULES: &[ClusterRule] = &[
    ClusterRule {
        pattern: "respiratory_infection",
        description: "Fever with cough and sore throat suggests a respiratory infection",
        categories: &[Fever, Cough, SoreThroat],
        cue: None,
        conditions: &["upper respiratory infection", "influenza", "COVID-19"],
    },
    ClusterRule {
        pattern: "cardiopulmonary",
        description: "Chest pain with breathing difficulty needs a cardiac or lung cause ruled out",
        categories: &[ChestPain, ShortnessOfBreath],
        cue: None,
        conditions: &["acute coronary syndrome", "pulmonary embolism", "pneumonia"],
    },
    ClusterRule {
        pattern: "meningitis_concern",
        description: "Headache, fever and a stiff neck together can indicate meningitis",
        categories: &[Headache, Fever],
        cue: Some("stiff neck"),
        conditions: &["meningitis"],
    },
    ClusterRule {
        pattern: "gastrointestinal",
        description: "Nausea with abdominal pain and fever suggests a gastrointestinal infection",
        categories: &[NauseaVomiting, AbdominalPain, Fever],
        cue: None,
        conditions: &["gastroenteritis", "food poisoning", "appendicitis"],
    },
    ClusterRule {
        pattern: "migraine",
        description: "Headache with nausea and dizziness fits a migraine pattern",
        categories: &[Headache, NauseaVomiting, Dizziness],
        cue: None,
        conditions: &["migraine", "vestibular migraine"],
    },
    ClusterRule {
        pattern: "influenza_like",
        description: "Fever, fatigue, body aches and cough fit an influenza-like illness",
        categories: &[Fever, Fatigue, JointPain, Cough],
        cue: None,
        conditions: &["influenza", "viral syndrome"],
    },
    ClusterRule {
        pattern: "anxiety",
        description: "Anxiety with dizziness and fatigue can reflect a stress response",
        categories: &[AnxietyMood, Dizziness, Fatigue],
        cue: None,
        conditions: &["anxiety disorder", "panic disorder"],
    },
    ClusterRule {
        pattern: "urinary_infection",
        description: "Urinary symptoms with fever or back pain can mean a kidney infection",
        categories: &[Urinary, Fever, BackPain],
        cue: None,
        conditions: &["urinary tract infection", "pyelonephritis"],
    },
    ClusterRule {
        pattern: "allergic_reaction",
        description: "Rash with breathing difficulty can be a serious allergic reaction",
        categories: &[SkinRash, ShortnessOfBreath],
        cue: None,
        conditions: &["anaphylaxis", "allergic reaction"],
    },
];

/// Matches active mentions against the static cluster rules. A rule is
/// reported once at least two of its elements are present.
pub fn map_relationships(mentions: &[SymptomMention], text: &str) -> Vec<SymptomRelationship> {
    let tokens = tokenize(text).join(" ");
    let active: Vec<SymptomCategory> = mentions
        .iter()
        .filter(|m| !m.negated)
        .map(|m| m.category)
        .collect();

    let mut relationships: Vec<SymptomRelationship> = CLUSTER_RULES
        .iter()
        .filter_map(|rule| {
            let present: Vec<SymptomCategory> = rule
                .categories
                .iter()
                .copied()
                .filter(|c| active.contains(c))
                .collect();
            let cue_present = rule.cue.is_some_and(|cue| contains_phrase(&tokens, cue));
            let matched = present.len() + usize::from(cue_present);
            let required = rule.categories.len() + usize::from(rule.cue.is_some());
            if matched < 2 {
                return None;
            }
            Some(SymptomRelationship {
                pattern: rule.pattern.to_string(),
                description: rule.description.to_string(),
                categories: present,
                strength: matched as f64 / required as f64,
            })
        })
        .collect();

    relationships.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    relationships
}

/// Conditions associated with a matched pattern.
pub fn pattern_conditions(pattern: &str) -> &'static [&'static str] {
    CLUSTER_RULES
        .iter()
        .find(|rule| rule.pattern == pattern)
        .map_or(&[], |rule| rule.conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::extraction::extract_symptoms;

    fn relationships_for(text: &str) -> Vec<SymptomRelationship> {
        map_relationships(&extract_symptoms(text), text)
    }

    #[test]
    fn test_full_cluster_is_strong() {
        let rels = relationships_for("fever, cough and a sore throat");
        let resp = rels.iter().find(|r| r.pattern == "respiratory_infection").unwrap();
        assert!(resp.is_strong());
        assert_eq!(resp.categories.len(), 3);
    }

    #[test]
    fn test_partial_cluster_has_fractional_strength() {
        let rels = relationships_for("I have a fever and a cough");
        let resp = rels.iter().find(|r| r.pattern == "respiratory_infection").unwrap();
        assert!((resp.strength - 2.0 / 3.0).abs() < 1e-9);
        assert!(!resp.is_strong());
    }

    #[test]
    fn test_cue_phrase_counts_towards_rule() {
        let rels = relationships_for("bad headache and fever with a stiff neck");
        let meningitis = rels.iter().find(|r| r.pattern == "meningitis_concern").unwrap();
        assert!(meningitis.is_strong());
        assert_eq!(rels[0].pattern, "meningitis_concern");
    }

    #[test]
    fn test_negated_mentions_do_not_count() {
        assert!(relationships_for("chest pain but no shortness of breath").is_empty());
    }
}
