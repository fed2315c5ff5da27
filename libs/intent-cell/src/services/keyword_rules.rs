use shared_utils::text::{contains_phrase, tokenize};

use super::corpus::KEYWORD_CUES;
use super::{normalized, uniform, Classifier};
use crate::models::{Distribution, Intent};

/// Sums the weights of cue phrases found in the text, per intent.
pub struct KeywordRules {
    cues: &'static [(Intent, &'static [(&'static str, f64)])],
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self { cues: KEYWORD_CUES }
    }
}

impl KeywordRules {
    pub fn scores(&self, text: &str) -> Distribution {
        let haystack = tokenize(text).join(" ");
        let mut scores = [0.0; Intent::COUNT];
        for (intent, cues) in self.cues {
            scores[intent.index()] += cues
                .iter()
                .filter(|(phrase, _)| contains_phrase(&haystack, phrase))
                .map(|(_, weight)| weight)
                .sum::<f64>();
        }
        scores
    }
}

impl Classifier for KeywordRules {
    fn name(&self) -> &'static str {
        "keyword_rules"
    }

    fn predict_proba(&self, text: &str) -> Distribution {
        let scores = self.scores(text);
        if scores.iter().all(|s| *s == 0.0) {
            return uniform();
        }
        normalized(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::argmax;

    #[test]
    fn test_emergency_cues_dominate() {
        let rules = KeywordRules::default();
        let (intent, p) = argmax(&rules.predict_proba("I can't breathe, call 911"));
        assert_eq!(intent, Intent::Emergency);
        assert!(p > 0.9);
    }

    #[test]
    fn test_cues_respect_word_boundaries() {
        let rules = KeywordRules::default();
        // "this" must not trigger the "hi" greeting cue
        assert_eq!(rules.scores("this")[Intent::Greeting.index()], 0.0);
    }
}
