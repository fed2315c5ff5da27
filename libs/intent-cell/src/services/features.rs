use shared_utils::text::tokenize;

/// Unigram plus adjacent-bigram features.
pub fn extract_features(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut features = tokens.clone();
    features.extend(tokens.windows(2).map(|pair| format!("{}_{}", pair[0], pair[1])));
    features
}

/// Softmax with a temperature; larger temperature gives a flatter output.
pub fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| ((s - max) / temperature).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}
