use std::collections::{HashMap, HashSet};

use super::features::{extract_features, softmax};
use super::{normalized, Classifier};
use crate::models::{Distribution, Intent};

const ALPHA: f64 = 1.0;

/// Multinomial naive Bayes over unigram and bigram counts with Laplace smoothing.
pub struct NaiveBayes {
    log_priors: Distribution,
    feature_counts: Vec<HashMap<String, f64>>,
    totals: Distribution,
    vocabulary: HashSet<String>,
}

impl NaiveBayes {
    pub fn train(samples: &[(Intent, &str)]) -> Self {
        let mut feature_counts = vec![HashMap::new(); Intent::COUNT];
        let mut totals = [0.0; Intent::COUNT];
        let mut docs = [0.0; Intent::COUNT];
        let mut vocabulary = HashSet::new();

        for (intent, text) in samples {
            let idx = intent.index();
            docs[idx] += 1.0;
            for feature in extract_features(text) {
                *feature_counts[idx].entry(feature.clone()).or_insert(0.0) += 1.0;
                totals[idx] += 1.0;
                vocabulary.insert(feature);
            }
        }

        let n = samples.len().max(1) as f64;
        let mut log_priors = [0.0; Intent::COUNT];
        for i in 0..Intent::COUNT {
            // Smoothed so an intent without samples is unlikely, not impossible.
            log_priors[i] = ((docs[i] + ALPHA) / (n + ALPHA * Intent::COUNT as f64)).ln();
        }

        Self { log_priors, feature_counts, totals, vocabulary }
    }

    fn log_likelihoods(&self, features: &[String]) -> Distribution {
        let v = self.vocabulary.len() as f64;
        let mut scores = self.log_priors;
        for (i, score) in scores.iter_mut().enumerate() {
            let denom = self.totals[i] + ALPHA * v;
            for feature in features.iter().filter(|f| self.vocabulary.contains(*f)) {
                let count = self.feature_counts[i].get(feature).copied().unwrap_or(0.0);
                *score += ((count + ALPHA) / denom).ln();
            }
        }
        scores
    }
}

impl Classifier for NaiveBayes {
    fn name(&self) -> &'static str {
        "naive_bayes"
    }

    fn predict_proba(&self, text: &str) -> Distribution {
        let scores = self.log_likelihoods(&extract_features(text));
        let probs = softmax(&scores, 1.0);
        let mut dist = [0.0; Intent::COUNT];
        dist.copy_from_slice(&probs);
        normalized(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::argmax;
    use crate::services::corpus::TRAINING_CORPUS;

    #[test]
    fn test_recognises_training_vocabulary() {
        let nb = NaiveBayes::train(TRAINING_CORPUS);
        assert_eq!(argmax(&nb.predict_proba("what is the dose of ibuprofen")).0, Intent::MedicationInquiry);
        assert_eq!(argmax(&nb.predict_proba("thank you so much")).0, Intent::Gratitude);
    }

    #[test]
    fn test_unknown_words_fall_back_to_priors() {
        let nb = NaiveBayes::train(TRAINING_CORPUS);
        let dist = nb.predict_proba("zzzz qqqq");
        assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        let spread = dist.iter().cloned().fold(0.0, f64::max) - dist.iter().cloned().fold(1.0, f64::min);
        assert!(spread < 0.1);
    }
}
