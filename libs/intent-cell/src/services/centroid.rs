use std::collections::HashMap;

use super::features::{extract_features, softmax};
use super::{normalized, uniform, Classifier};
use crate::models::{Distribution, Intent};

/// Lower values sharpen the distribution over cosine similarities.
const TEMPERATURE: f64 = 0.15;

type SparseVector = HashMap<String, f64>;

/// Nearest-centroid classifier over L2-normalised term-frequency vectors.
pub struct NearestCentroid {
    centroids: Vec<SparseVector>,
}

fn term_frequencies(text: &str) -> SparseVector {
    let mut tf = SparseVector::new();
    for feature in extract_features(text) {
        *tf.entry(feature).or_insert(0.0) += 1.0;
    }
    l2_normalize(&mut tf);
    tf
}

fn l2_normalize(v: &mut SparseVector) {
    let norm = v.values().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        v.values_mut().for_each(|x| *x /= norm);
    }
}

fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(k, x)| large.get(k).map(|y| x * y))
        .sum()
}

impl NearestCentroid {
    pub fn train(samples: &[(Intent, &str)]) -> Self {
        let mut centroids = vec![SparseVector::new(); Intent::COUNT];
        for (intent, text) in samples {
            let centroid = &mut centroids[intent.index()];
            for (feature, weight) in term_frequencies(text) {
                *centroid.entry(feature).or_insert(0.0) += weight;
            }
        }
        centroids.iter_mut().for_each(l2_normalize);
        Self { centroids }
    }

    /// Cosine similarity of `text` to every centroid.
    pub fn similarities(&self, text: &str) -> Distribution {
        let tf = term_frequencies(text);
        let mut sims = [0.0; Intent::COUNT];
        for (i, centroid) in self.centroids.iter().enumerate() {
            sims[i] = dot(&tf, centroid);
        }
        sims
    }
}

impl Classifier for NearestCentroid {
    fn name(&self) -> &'static str {
        "nearest_centroid"
    }

    fn predict_proba(&self, text: &str) -> Distribution {
        let sims = self.similarities(text);
        if sims.iter().all(|s| *s == 0.0) {
            return uniform();
        }
        let mut dist = [0.0; Intent::COUNT];
        dist.copy_from_slice(&softmax(&sims, TEMPERATURE));
        normalized(dist)
    }
}
