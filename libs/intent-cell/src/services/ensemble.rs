use tracing::debug;

use super::corpus::TRAINING_CORPUS;
use super::predictive::successor_prior;
use super::{argmax, normalized, Classifier, KeywordRules, NaiveBayes, NearestCentroid};
use crate::models::{ClassifierVote, Distribution, Intent, IntentPrediction, IntentScore, TurnContext};

const LOW_CONFIDENCE: f64 = 0.35;
const FOLLOW_UP_BOOST: f64 = 0.15;
/// Share of the result taken from what usually follows the previous intent.
const TRANSITION_PRIOR_WEIGHT: f64 = 0.1;

/// Weighted soft-voting ensemble of the three intent classifiers.
pub struct IntentPredictionModel {
    members: Vec<(Box<dyn Classifier>, f64)>,
}

impl Default for IntentPredictionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentPredictionModel {
    /// Trains every member on the built-in corpus.
    pub fn new() -> Self {
        Self::with_members(vec![
            (Box::new(NaiveBayes::train(TRAINING_CORPUS)), 0.4),
            (Box::new(NearestCentroid::train(TRAINING_CORPUS)), 0.35),
            (Box::new(KeywordRules::default()), 0.25),
        ])
    }

    pub fn with_members(members: Vec<(Box<dyn Classifier>, f64)>) -> Self {
        Self { members }
    }

    pub fn predict(&self, text: &str) -> IntentPrediction {
        self.predict_with_context(text, &TurnContext::default())
    }

    pub fn predict_with_context(&self, text: &str, context: &TurnContext) -> IntentPrediction {
        if text.trim().is_empty() {
            return IntentPrediction {
                intent: Intent::ClarificationRequest,
                confidence: 0.0,
                low_confidence: true,
                agreement: 0,
                votes: Vec::new(),
                probabilities: Vec::new(),
            };
        }

        let mut combined: Distribution = [0.0; Intent::COUNT];
        let mut votes = Vec::with_capacity(self.members.len());
        for (classifier, weight) in &self.members {
            let dist = classifier.predict_proba(text);
            for (acc, p) in combined.iter_mut().zip(dist.iter()) {
                *acc += weight * p;
            }
            let (intent, confidence) = argmax(&dist);
            votes.push(ClassifierVote {
                classifier: classifier.name(),
                intent,
                confidence,
                weight: *weight,
            });
        }

        let combined = context_boost(normalized(combined), context);
        let (intent, confidence) = argmax(&combined);
        let agreement = votes.iter().filter(|v| v.intent == intent).count();
        debug!(%intent, confidence, agreement, "Intent predicted");

        IntentPrediction {
            intent,
            confidence,
            low_confidence: confidence < LOW_CONFIDENCE,
            agreement,
            votes,
            probabilities: ranked(&combined),
        }
    }
}

/// Folds the conversation state into a classifier distribution: a small prior
/// from the previous intent, then a bonus for `follow_up_answer` when the
/// bot's last turn was a question.
pub fn context_boost(dist: Distribution, context: &TurnContext) -> Distribution {
    if context.previous_intent.is_none() && !context.bot_asked_question {
        return dist;
    }
    let mut boosted = dist;
    if let Some(previous) = context.previous_intent {
        let prior = successor_prior(previous);
        for (p, q) in boosted.iter_mut().zip(prior.iter()) {
            *p = (1.0 - TRANSITION_PRIOR_WEIGHT) * *p + TRANSITION_PRIOR_WEIGHT * q;
        }
    }
    if context.bot_asked_question {
        boosted[Intent::FollowUpAnswer.index()] += FOLLOW_UP_BOOST;
    }
    normalized(boosted)
}

/// Intents sorted by descending probability.
pub fn ranked(dist: &Distribution) -> Vec<IntentScore> {
    let mut scores: Vec<IntentScore> = Intent::ALL
        .iter()
        .map(|intent| IntentScore { intent: *intent, probability: dist[intent.index()] })
        .collect();
    scores.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::uniform;

    #[test]
    fn test_empty_input_asks_for_clarification() {
        let model = IntentPredictionModel::new();
        let prediction = model.predict("   ");
        assert_eq!(prediction.intent, Intent::ClarificationRequest);
        assert_eq!(prediction.confidence, 0.0);
        assert!(prediction.low_confidence);
    }

    #[test]
    fn test_classifies_common_utterances() {
        let model = IntentPredictionModel::new();
        let cases = [
            ("hello there", Intent::Greeting),
            ("I have a terrible headache and a fever", Intent::SymptomDescription),
            ("can I take ibuprofen with aspirin", Intent::MedicationInquiry),
            ("I want to book an appointment", Intent::AppointmentRequest),
            ("I can't breathe call an ambulance", Intent::Emergency),
            ("thanks a lot", Intent::Gratitude),
            ("goodbye", Intent::Goodbye),
            ("what do you mean", Intent::ClarificationRequest),
        ];
        for (text, expected) in cases {
            assert_eq!(model.predict(text).intent, expected, "text: {text}");
        }
    }

    #[test]
    fn test_probabilities_are_a_ranked_distribution() {
        let model = IntentPredictionModel::new();
        let prediction = model.predict("my stomach hurts");
        let sum: f64 = prediction.probabilities.iter().map(|s| s.probability).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(prediction.probabilities[0].intent, prediction.intent);
        assert!(prediction.probabilities.windows(2).all(|w| w[0].probability >= w[1].probability));
        assert_eq!(prediction.votes.len(), 3);
        assert!(prediction.agreement >= 1);
    }

    #[test]
    fn test_question_context_raises_follow_up_probability() {
        let model = IntentPredictionModel::new();
        let plain = model.predict("about two days");
        let asked = model.predict_with_context(
            "about two days",
            &TurnContext { previous_intent: Some(Intent::SymptomDescription), bot_asked_question: true },
        );
        let p = |pred: &IntentPrediction| {
            pred.probabilities
                .iter()
                .find(|s| s.intent == Intent::FollowUpAnswer)
                .map(|s| s.probability)
                .unwrap_or_default()
        };
        assert!(p(&asked) > p(&plain));
        assert_eq!(asked.intent, Intent::FollowUpAnswer);
    }

    #[test]
    fn test_previous_intent_tilts_toward_its_usual_successor() {
        let flat = uniform();
        assert_eq!(context_boost(flat, &TurnContext::default()), flat);

        let after_thanks = context_boost(
            flat,
            &TurnContext { previous_intent: Some(Intent::Gratitude), bot_asked_question: false },
        );
        assert_eq!(argmax(&after_thanks).0, Intent::Goodbye);
        assert!((after_thanks.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        // a confident classifier still wins
        let mut greeting = [0.0; Intent::COUNT];
        greeting[Intent::Greeting.index()] = 1.0;
        let kept = context_boost(
            greeting,
            &TurnContext { previous_intent: Some(Intent::Gratitude), bot_asked_question: false },
        );
        assert_eq!(argmax(&kept).0, Intent::Greeting);
    }
}
