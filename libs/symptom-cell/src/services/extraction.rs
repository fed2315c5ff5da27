use std::sync::LazyLock;

use regex::Regex;

use shared_models::clinical::Severity;
use shared_utils::text::{find_phrase, matched, normalize, phrase_offsets, tokenize};

use super::catalogue::CATALOGUE;
use crate::models::{SymptomCategory, SymptomDuration, SymptomMention};

const NEGATORS: &[&str] = &[
    "no", "not", "without", "denies", "deny", "never", "dont", "doesnt", "didnt", "havent", "hasnt", "none",
];
/// Words before a phrase that are checked for a negator.
const NEGATION_WINDOW: usize = 3;

const SEVERE_MODIFIERS: &[&str] = &[
    "severe", "severely", "worst", "unbearable", "excruciating", "terrible", "intense", "extreme",
    "agonizing", "agonising", "crushing", "really bad", "very bad",
];
const MODERATE_MODIFIERS: &[&str] = &["moderate", "quite bad", "pretty bad", "fairly"];
const MILD_MODIFIERS: &[&str] = &["mild", "mildly", "slight", "slightly", "minor", "a little", "a bit"];

/// Most specific first, so "lower back" wins over "back".
const LOCATIONS: &[&str] = &[
    "left side", "right side", "lower left", "lower right", "upper left", "upper right",
    "lower back", "upper back", "lower abdomen", "upper abdomen", "left arm", "right arm",
    "left leg", "right leg", "behind my eyes", "back of my head", "forehead", "temples",
    "one side", "both sides", "neck", "jaw", "shoulder", "chest", "throat", "knee", "hip",
];

static PAIN_SCALE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\s*(?:/|out of)\s*10\b").expect("valid regex"));

static DURATION_FOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:for|over)\s+(?:the\s+)?(?:last\s+|past\s+)?(\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten|a few|few|several|a couple of|couple of)\s+(minute|hour|day|night|week|month|year)s?\b",
    )
    .expect("valid regex")
});

static DURATION_AGO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten|a few|few|several|a couple of|couple of)\s+(minute|hour|day|night|week|month|year)s?\s+ago\b",
    )
    .expect("valid regex")
});

static DURATION_SINCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bsince\s+(yesterday|last night|this morning|this afternoon|last week|last month|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    )
    .expect("valid regex")
});

/// Splits free text into multi-symptom mentions, one per category.
///
/// A category mentioned both negated and affirmed keeps the affirmed mention.
pub fn extract_symptoms(text: &str) -> Vec<SymptomMention> {
    let whole = normalize(text);
    let text_scale = pain_scale(&whole);
    let text_duration = duration(&whole);

    let mut mentions: Vec<SymptomMention> = Vec::new();
    for clause in clauses(&whole) {
        let tokens = tokenize(clause).join(" ");
        for profile in CATALOGUE.iter() {
            let keywords = matched(&tokens, profile.keywords);
            if keywords.is_empty() {
                continue;
            }
            let negated = keywords.iter().all(|k| is_negated(&tokens, k));
            let mention = build_mention(profile.category, keywords, negated, clause, &tokens);
            merge(&mut mentions, mention);
        }
    }

    // Ratings and durations stated in their own sentence apply to the
    // mentions that did not state one.
    for mention in mentions.iter_mut().filter(|m| !m.negated) {
        if !mention.severity_stated {
            if let Some(rating) = text_scale {
                mention.pain_scale = Some(rating);
                mention.severity = Severity::from_pain_scale(rating);
                mention.severity_stated = true;
            }
        }
        if mention.duration.is_none() {
            mention.duration = text_duration.clone();
        }
    }

    mentions.sort_by_key(|m| m.category);
    mentions
}

fn clauses(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c| matches!(c, '.' | ',' | ';' | '!' | '?' | '\n'))
        .flat_map(|part| part.split(" but "))
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

fn build_mention(
    category: SymptomCategory,
    keywords: Vec<&str>,
    negated: bool,
    clause: &str,
    tokens: &str,
) -> SymptomMention {
    let scale = pain_scale(clause);
    let (severity, severity_stated) = match scale {
        Some(rating) => (Severity::from_pain_scale(rating), true),
        None => match severity_modifier(tokens) {
            Some(severity) => (severity, true),
            None => (Severity::default(), false),
        },
    };

    SymptomMention {
        category,
        keywords: keywords.into_iter().map(str::to_string).collect(),
        severity,
        severity_stated,
        pain_scale: scale,
        duration: duration(clause),
        location: LOCATIONS
            .iter()
            .find(|loc| find_phrase(tokens, loc).is_some())
            .map(|loc| loc.to_string()),
        negated,
    }
}

fn merge(mentions: &mut Vec<SymptomMention>, mention: SymptomMention) {
    let Some(existing) = mentions.iter_mut().find(|m| m.category == mention.category) else {
        mentions.push(mention);
        return;
    };
    if existing.negated && !mention.negated {
        *existing = mention;
        return;
    }
    if mention.negated {
        return;
    }
    for keyword in mention.keywords {
        if !existing.keywords.contains(&keyword) {
            existing.keywords.push(keyword);
        }
    }
    if mention.severity_stated && (!existing.severity_stated || mention.severity > existing.severity) {
        existing.severity = mention.severity;
        existing.severity_stated = true;
        existing.pain_scale = mention.pain_scale.or(existing.pain_scale);
    }
    existing.duration = existing.duration.take().or(mention.duration);
    existing.location = existing.location.take().or(mention.location);
}

/// True when `phrase` occurs and every occurrence has a negator in the few
/// words before it. One affirmed occurrence is enough to count the phrase.
pub fn is_negated(tokens: &str, phrase: &str) -> bool {
    let offsets = phrase_offsets(tokens, phrase);
    !offsets.is_empty()
        && offsets.iter().all(|&pos| {
            tokens[..pos]
                .split_whitespace()
                .rev()
                .take(NEGATION_WINDOW)
                .any(|word| NEGATORS.contains(&word))
        })
}

fn severity_modifier(tokens: &str) -> Option<Severity> {
    if SEVERE_MODIFIERS.iter().any(|m| find_phrase(tokens, m).is_some()) {
        Some(Severity::Severe)
    } else if MODERATE_MODIFIERS.iter().any(|m| find_phrase(tokens, m).is_some()) {
        Some(Severity::Moderate)
    } else if MILD_MODIFIERS.iter().any(|m| find_phrase(tokens, m).is_some()) {
        Some(Severity::Mild)
    } else {
        None
    }
}

pub fn pain_scale(text: &str) -> Option<u8> {
    PAIN_SCALE
        .captures(text)
        .and_then(|caps| caps[1].parse::<u8>().ok())
        .filter(|rating| *rating <= 10)
}

pub fn duration(text: &str) -> Option<SymptomDuration> {
    if let Some(caps) = DURATION_FOR.captures(text).or_else(|| DURATION_AGO.captures(text)) {
        let count = count_word(&caps[1])?;
        return Some(SymptomDuration {
            text: caps[0].to_string(),
            hours: count * unit_hours(&caps[2]),
        });
    }
    DURATION_SINCE.captures(text).map(|caps| SymptomDuration {
        text: caps[0].to_string(),
        hours: since_hours(&caps[1]),
    })
}

fn count_word(word: &str) -> Option<f64> {
    let value = match word {
        "a" | "an" | "one" => 1.0,
        "two" | "a couple of" | "couple of" => 2.0,
        "three" | "a few" | "few" => 3.0,
        "four" | "several" => 4.0,
        "five" => 5.0,
        "six" => 6.0,
        "seven" => 7.0,
        "eight" => 8.0,
        "nine" => 9.0,
        "ten" => 10.0,
        digits => digits.parse().ok()?,
    };
    Some(value)
}

fn unit_hours(unit: &str) -> f64 {
    match unit {
        "minute" => 1.0 / 60.0,
        "hour" => 1.0,
        "day" | "night" => 24.0,
        "week" => 168.0,
        "month" => 720.0,
        _ => 8760.0,
    }
}

fn since_hours(anchor: &str) -> f64 {
    match anchor {
        "this afternoon" => 3.0,
        "this morning" => 6.0,
        "last night" => 12.0,
        "yesterday" => 24.0,
        "last week" => 168.0,
        "last month" => 720.0,
        // a named weekday is at most a week back
        _ => 72.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(mentions: &[SymptomMention], category: SymptomCategory) -> &SymptomMention {
        mentions
            .iter()
            .find(|m| m.category == category)
            .unwrap_or_else(|| panic!("{category} not extracted"))
    }

    #[test]
    fn test_extracts_multiple_symptoms() {
        let mentions = extract_symptoms("I have a headache, a fever and I keep coughing");
        let categories: Vec<_> = mentions.iter().map(|m| m.category).collect();
        assert_eq!(
            categories,
            vec![SymptomCategory::Headache, SymptomCategory::Fever, SymptomCategory::Cough]
        );
    }

    #[test]
    fn test_negated_symptoms_are_flagged() {
        let mentions = extract_symptoms("I have a sore throat but no fever. I don't have a cough");
        assert!(!find(&mentions, SymptomCategory::SoreThroat).negated);
        assert!(find(&mentions, SymptomCategory::Fever).negated);
        assert!(find(&mentions, SymptomCategory::Cough).negated);
    }

    #[test]
    fn test_affirmed_mention_overrides_negated() {
        let mentions = extract_symptoms("No fever yesterday. Now I have a fever");
        assert!(!find(&mentions, SymptomCategory::Fever).negated);
    }

    #[test]
    fn test_negation_needs_every_occurrence_negated() {
        assert!(is_negated("no stiff neck", "stiff neck"));
        assert!(!is_negated("no stiff neck now i have a stiff neck", "stiff neck"));
        assert!(!is_negated("a headache", "stiff neck"));
    }

    #[test]
    fn test_severity_from_modifier_and_scale() {
        let mentions = extract_symptoms("severe chest pain. My headache is about 2/10");
        let chest = find(&mentions, SymptomCategory::ChestPain);
        assert_eq!(chest.severity, Severity::Severe);
        assert!(chest.severity_stated);

        let head = find(&mentions, SymptomCategory::Headache);
        assert_eq!(head.pain_scale, Some(2));
        assert_eq!(head.severity, Severity::Mild);
    }

    #[test]
    fn test_unstated_severity_defaults_to_moderate() {
        let mentions = extract_symptoms("my knee hurts");
        let knee = find(&mentions, SymptomCategory::JointPain);
        assert_eq!(knee.severity, Severity::Moderate);
        assert!(!knee.severity_stated);
        assert_eq!(knee.location.as_deref(), Some("knee"));
    }

    #[test]
    fn test_durations() {
        assert_eq!(duration("for 3 days").map(|d| d.hours), Some(72.0));
        assert_eq!(duration("for the past two weeks").map(|d| d.hours), Some(336.0));
        assert_eq!(duration("started a few hours ago").map(|d| d.hours), Some(3.0));
        assert_eq!(duration("since yesterday").map(|d| d.hours), Some(24.0));
        assert!(duration("for a while").is_none());
    }

    #[test]
    fn test_duration_sentence_applies_to_earlier_mentions() {
        let mentions = extract_symptoms("I have a headache. It started 2 days ago.");
        let head = find(&mentions, SymptomCategory::Headache);
        assert_eq!(head.duration.as_ref().map(|d| d.hours), Some(48.0));
    }

    #[test]
    fn test_pain_scale_rejects_out_of_range() {
        assert_eq!(pain_scale("it is 7/10"), Some(7));
        assert_eq!(pain_scale("8 out of 10"), Some(8));
        assert_eq!(pain_scale("99/10"), None);
    }

    #[test]
    fn test_nothing_recognised() {
        assert!(extract_symptoms("I would like to know about vitamins").is_empty());
    }
}
