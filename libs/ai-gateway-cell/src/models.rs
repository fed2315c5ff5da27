use serde::{Deserialize, Serialize};

use shared_config::ProviderKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInput {
    pub mime_type: String,
    /// Base64 encoded image bytes, without a data-URL prefix.
    pub data: String,
}

impl ImageInput {
    /// Accepts raw base64 or a `data:<mime>;base64,<payload>` URL.
    pub fn from_base64(raw: &str, default_mime: &str) -> Self {
        if let Some(rest) = raw.strip_prefix("data:") {
            if let Some((mime, payload)) = rest.split_once(";base64,") {
                return Self {
                    mime_type: mime.to_string(),
                    data: payload.to_string(),
                };
            }
        }
        Self {
            mime_type: default_mime.to_string(),
            data: raw.trim().to_string(),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_mode: bool,
    pub image: Option<ImageInput>,
}

impl LlmRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: 0.4,
            max_tokens: 1024,
            json_mode: false,
            image: None,
        }
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub provider: ProviderKind,
    pub model: String,
    pub text: String,
    pub cached: bool,
}

/// Where a planner result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Parsed from structured JSON returned by a model.
    Ai,
    /// Scraped from a free-text model answer.
    AiText,
    /// Static fallback dictionary.
    Fallback,
}

// Nutrition planning DTOs

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionPlanRequest {
    pub goal: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub goal: String,
    pub daily_calories: Option<u32>,
    pub macros: Option<MacroTargets>,
    pub recommended_foods: Vec<String>,
    pub foods_to_avoid: Vec<String>,
    pub meal_ideas: Vec<String>,
    pub tips: Vec<String>,
    pub source: ResultSource,
    pub provider: Option<ProviderKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRequest {
    pub goal: String,
    pub current_weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub timeframe_weeks: Option<u32>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalMilestone {
    pub week: u32,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPlan {
    pub goal: String,
    pub weekly_change_kg: Option<f64>,
    pub realistic: bool,
    pub milestones: Vec<GoalMilestone>,
    pub habits: Vec<String>,
    pub source: ResultSource,
    pub provider: Option<ProviderKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSuggestionRequest {
    pub goal: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub meal_type: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSuggestions {
    pub suggestions: Vec<String>,
    pub rationale: Option<String>,
    pub source: ResultSource,
    pub provider: Option<ProviderKind>,
}

// Provider status DTO

#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    pub model: String,
    pub key_count: usize,
    pub keys_cooling_down: usize,
    pub circuit: String,
    pub supports_vision: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GatewayStatus {
    pub providers: Vec<ProviderStatus>,
    pub cache_entries: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_input_parses_data_url() {
        let image = ImageInput::from_base64("data:image/png;base64,AAAA", "image/jpeg");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "AAAA");
        assert_eq!(image.data_url(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_image_input_defaults_mime_for_raw_base64() {
        let image = ImageInput::from_base64(" QUJD ", "image/jpeg");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "QUJD");
    }
}
