use crate::models::{Nutrients, StageConfidence};

const VISION_WEIGHT: f64 = 0.4;
const NUTRITION_WEIGHT: f64 = 0.3;
const DATABASE_WEIGHT: f64 = 0.3;

/// 0–100. Penalises sugar over 10 g, saturated fat over 5 g and sodium over
/// 400 mg; rewards fibre (up to 10 g) and protein (up to 30 g).
pub fn health_score(totals: &Nutrients) -> f64 {
    let score = 100.0
        - 0.5 * (totals.sugar_g - 10.0).max(0.0)
        - 0.6 * (totals.saturated_fat_g - 5.0).max(0.0)
        - 0.02 * (totals.sodium_mg - 400.0).max(0.0)
        + 1.5 * totals.fiber_g.min(10.0)
        + 0.3 * totals.protein_g.min(30.0);
    (score.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

pub fn overall_confidence(stages: &StageConfidence) -> f64 {
    let weighted = VISION_WEIGHT * stages.vision
        + NUTRITION_WEIGHT * stages.nutrition
        + DATABASE_WEIGHT * stages.database;
    (weighted.clamp(0.0, 1.0) * 100.0).round() / 100.0
}
