pub mod centroid;
pub mod corpus;
pub mod ensemble;
pub mod features;
pub mod keyword_rules;
pub mod naive_bayes;
pub mod predictive;

pub use centroid::NearestCentroid;
pub use ensemble::IntentPredictionModel;
pub use keyword_rules::KeywordRules;
pub use naive_bayes::NaiveBayes;
pub use predictive::PredictiveIntentEngine;

use crate::models::{Distribution, Intent};

/// A text classifier producing a probability per intent.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Distribution over intents. Always sums to 1.
    fn predict_proba(&self, text: &str) -> Distribution;
}

pub(crate) fn uniform() -> Distribution {
    [1.0 / Intent::COUNT as f64; Intent::COUNT]
}

/// Index and value of the largest entry. Ties keep the earlier intent.
pub(crate) fn argmax(dist: &Distribution) -> (Intent, f64) {
    let mut best = 0;
    for i in 1..Intent::COUNT {
        if dist[i] > dist[best] {
            best = i;
        }
    }
    (Intent::from_index(best), dist[best])
}

pub(crate) fn normalized(mut dist: Distribution) -> Distribution {
    let sum: f64 = dist.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return uniform();
    }
    for p in dist.iter_mut() {
        *p /= sum;
    }
    dist
}
