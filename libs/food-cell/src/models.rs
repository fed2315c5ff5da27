use std::ops::{Add, Mul};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use ai_gateway_cell::{AiGatewayError, ResultSource};
use shared_config::ProviderKind;

/// A food seen in the image (or named by the caller) with its estimated
/// portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub portion_grams: f64,
    pub confidence: f64,
}

/// Nutrient amounts. Depending on context these are per 100 g or per
/// portion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub sugar_g: f64,
    pub fiber_g: f64,
    pub saturated_fat_g: f64,
    pub sodium_mg: f64,
}

impl Nutrients {
    /// Per-100 g values scaled to a portion.
    pub fn for_portion(&self, grams: f64) -> Nutrients {
        *self * (grams / 100.0)
    }

    pub fn rounded(&self) -> Nutrients {
        let r = |v: f64| (v * 10.0).round() / 10.0;
        Nutrients {
            calories: self.calories.round(),
            protein_g: r(self.protein_g),
            carbs_g: r(self.carbs_g),
            fat_g: r(self.fat_g),
            sugar_g: r(self.sugar_g),
            fiber_g: r(self.fiber_g),
            saturated_fat_g: r(self.saturated_fat_g),
            sodium_mg: self.sodium_mg.round(),
        }
    }
}

impl Add for Nutrients {
    type Output = Nutrients;

    fn add(self, other: Nutrients) -> Nutrients {
        Nutrients {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fat_g: self.fat_g + other.fat_g,
            sugar_g: self.sugar_g + other.sugar_g,
            fiber_g: self.fiber_g + other.fiber_g,
            saturated_fat_g: self.saturated_fat_g + other.saturated_fat_g,
            sodium_mg: self.sodium_mg + other.sodium_mg,
        }
    }
}

impl Mul<f64> for Nutrients {
    type Output = Nutrients;

    fn mul(self, factor: f64) -> Nutrients {
        Nutrients {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
            sugar_g: self.sugar_g * factor,
            fiber_g: self.fiber_g * factor,
            saturated_fat_g: self.saturated_fat_g * factor,
            sodium_mg: self.sodium_mg * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientSource {
    Usda,
    OpenFoodFacts,
    Ai,
    /// Built-in table of typical values.
    Estimate,
}

/// A per-100 g record found in a food database.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseHit {
    pub source: NutrientSource,
    pub description: String,
    pub per_100g: Nutrients,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedFoodItem {
    pub name: String,
    pub portion_grams: f64,
    pub nutrients: Nutrients,
    pub source: NutrientSource,
    pub database_match: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StageConfidence {
    pub vision: f64,
    pub nutrition: f64,
    pub database: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodAnalysis {
    pub id: Uuid,
    pub items: Vec<AnalyzedFoodItem>,
    pub totals: Nutrients,
    pub health_score: f64,
    pub confidence: f64,
    pub stage_confidence: StageConfidence,
    pub alternatives: Vec<String>,
    pub alternatives_source: ResultSource,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recognition {
    pub items: Vec<FoodItem>,
    pub provider: Option<ProviderKind>,
    pub confidence: f64,
}

// ==============================================================================
// HTTP
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct RecognizeFoodRequest {
    pub image_base64: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeFoodRequest {
    pub image_base64: Option<String>,
    pub mime_type: Option<String>,
    /// Skips image recognition when given.
    pub food_name: Option<String>,
    /// Weight of the named food, or of everything in the photo. Recognised
    /// portions are scaled to add up to it.
    pub portion_grams: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum FoodRecognitionError {
    #[error("Either an image or a food name is required")]
    MissingInput,
    #[error("Image is not valid base64")]
    InvalidImage,
    #[error("Image too large: {0} bytes (max {1})")]
    ImageTooLarge(usize, usize),
    #[error("Portion must be between 1 and 5000 grams")]
    InvalidPortion,
    #[error("No food recognised in the image")]
    NoFoodDetected,
    #[error("Image recognition failed: {0}")]
    Vision(#[from] AiGatewayError),
}

impl IntoResponse for FoodRecognitionError {
    fn into_response(self) -> Response {
        let status = match &self {
            FoodRecognitionError::MissingInput
            | FoodRecognitionError::InvalidImage
            | FoodRecognitionError::InvalidPortion => StatusCode::BAD_REQUEST,
            FoodRecognitionError::ImageTooLarge(..) => StatusCode::PAYLOAD_TOO_LARGE,
            FoodRecognitionError::NoFoodDetected => StatusCode::UNPROCESSABLE_ENTITY,
            FoodRecognitionError::Vision(AiGatewayError::NoProviderAvailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            FoodRecognitionError::Vision(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
