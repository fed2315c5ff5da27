// =====================================================================================
// FOOD RECOGNITION PIPELINE
// =====================================================================================
//
// vision -> nutrition estimate -> database lookup -> healthier alternatives
//
// Only the vision stage can fail the request; the others degrade to tables.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use ai_gateway_cell::{AiServiceManager, ImageInput, LlmRequest, ResultSource};
use shared_config::AppConfig;
use shared_utils::llm_json::{extract_json, number_field, scrape_list, string_list};

use super::databases::{databases_from_config, FoodDatabase};
use super::scoring::{health_score, overall_confidence};
use super::tables::{static_alternatives, typical_values, GENERIC_PER_100G};
use crate::models::{
    AnalyzeFoodRequest, AnalyzedFoodItem, DatabaseHit, FoodAnalysis, FoodItem, FoodRecognitionError,
    NutrientSource, Nutrients, Recognition, StageConfidence,
};

pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;
const MAX_ITEMS: usize = 8;
const MAX_ALTERNATIVES: usize = 5;
const DEFAULT_PORTION_GRAMS: f64 = 100.0;
const DEFAULT_ITEM_CONFIDENCE: f64 = 0.7;
const SCRAPED_ITEM_CONFIDENCE: f64 = 0.5;

const AI_NUTRITION_CONFIDENCE: f64 = 0.7;
const TABLE_NUTRITION_CONFIDENCE: f64 = 0.5;
const GENERIC_NUTRITION_CONFIDENCE: f64 = 0.2;

const VISION_SYSTEM: &str = "You identify foods in photos for a nutrition app. Answer only with JSON.";
const NUTRITION_SYSTEM: &str = "You are a nutritionist estimating nutrient content. Answer only with JSON.";
const ALTERNATIVES_SYSTEM: &str = "You suggest practical, healthier swaps for meals. Answer only with JSON.";

pub struct FoodRecognitionService {
    ai: Arc<AiServiceManager>,
    databases: Vec<Box<dyn FoodDatabase>>,
}

impl FoodRecognitionService {
    pub fn new(config: &AppConfig, ai: Arc<AiServiceManager>) -> Self {
        Self::with_databases(ai, databases_from_config(config))
    }

    pub fn with_databases(ai: Arc<AiServiceManager>, databases: Vec<Box<dyn FoodDatabase>>) -> Self {
        Self { ai, databases }
    }

    /// Vision stage on its own.
    #[instrument(skip_all)]
    pub async fn recognize(&self, image_base64: &str, mime_type: Option<&str>) -> Result<Recognition, FoodRecognitionError> {
        let image = decode_image(image_base64, mime_type)?;
        let request = LlmRequest::new(VISION_SYSTEM, vision_prompt())
            .json()
            .with_temperature(0.2)
            .with_image(image);
        let response = self.ai.generate(&request).await?;

        let items = parse_food_items(&response.text);
        if items.is_empty() {
            return Err(FoodRecognitionError::NoFoodDetected);
        }
        let confidence = mean(items.iter().map(|i| i.confidence));
        info!(items = items.len(), provider = %response.provider, "Food recognised");
        Ok(Recognition { items, provider: Some(response.provider), confidence })
    }

    #[instrument(skip_all, fields(named = request.food_name.is_some()))]
    pub async fn analyze(&self, request: AnalyzeFoodRequest) -> Result<FoodAnalysis, FoodRecognitionError> {
        if let Some(grams) = request.portion_grams {
            if !(1.0..=5000.0).contains(&grams) {
                return Err(FoodRecognitionError::InvalidPortion);
            }
        }

        let recognition = match (&request.food_name, &request.image_base64) {
            (Some(name), _) if !name.trim().is_empty() => Recognition {
                items: vec![FoodItem {
                    name: name.trim().to_string(),
                    portion_grams: request.portion_grams.unwrap_or(DEFAULT_PORTION_GRAMS),
                    confidence: 1.0,
                }],
                provider: None,
                confidence: 1.0,
            },
            (_, Some(image)) => {
                let mut recognition = self.recognize(image, request.mime_type.as_deref()).await?;
                if let Some(grams) = request.portion_grams {
                    scale_to_total(&mut recognition.items, grams);
                }
                recognition
            }
            _ => return Err(FoodRecognitionError::MissingInput),
        };

        let (estimates, nutrition_confidence) = self.estimate_nutrition(&recognition.items).await;
        let hits = self.lookup(&recognition.items).await;
        let database_confidence = hits.iter().filter(|h| h.is_some()).count() as f64 / hits.len() as f64;

        let items: Vec<AnalyzedFoodItem> = recognition
            .items
            .iter()
            .zip(estimates)
            .zip(hits)
            .map(|((item, (estimate, source)), hit)| match hit {
                Some(hit) => AnalyzedFoodItem {
                    name: item.name.clone(),
                    portion_grams: item.portion_grams,
                    nutrients: hit.per_100g.for_portion(item.portion_grams).rounded(),
                    source: hit.source,
                    database_match: Some(hit.description),
                },
                None => AnalyzedFoodItem {
                    name: item.name.clone(),
                    portion_grams: item.portion_grams,
                    nutrients: estimate.rounded(),
                    source,
                    database_match: None,
                },
            })
            .collect();

        let totals = items
            .iter()
            .fold(Nutrients::default(), |acc, item| acc + item.nutrients)
            .rounded();
        let stage_confidence = StageConfidence {
            vision: recognition.confidence,
            nutrition: nutrition_confidence,
            database: database_confidence,
        };
        let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
        let (alternatives, alternatives_source) = self.alternatives(&names, &totals).await;

        let analysis = FoodAnalysis {
            id: Uuid::new_v4(),
            health_score: health_score(&totals),
            confidence: overall_confidence(&stage_confidence),
            items,
            totals,
            stage_confidence,
            alternatives,
            alternatives_source,
            analyzed_at: Utc::now(),
        };
        debug!(score = analysis.health_score, confidence = analysis.confidence, "Food analysed");
        Ok(analysis)
    }

    /// Per-portion estimates from the model, falling back to the table for
    /// any item the model leaves out.
    async fn estimate_nutrition(&self, items: &[FoodItem]) -> (Vec<(Nutrients, NutrientSource)>, f64) {
        let from_model = if self.ai.is_available() {
            let request = LlmRequest::new(NUTRITION_SYSTEM, nutrition_prompt(items))
                .json()
                .with_temperature(0.2);
            match self.ai.generate(&request).await {
                Ok(response) => extract_json(&response.text),
                Err(e) => {
                    warn!("Nutrition estimate falling back to table: {}", e);
                    None
                }
            }
        } else {
            None
        };
        let model_items = from_model
            .as_ref()
            .and_then(|json| json.get("items").or(Some(json)))
            .and_then(Value::as_array);

        let mut confidences = Vec::with_capacity(items.len());
        let estimates = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let modelled = model_items
                    .and_then(|list| matching_entry(list, &item.name, idx))
                    .and_then(nutrients_from_json);
                if let Some(nutrients) = modelled {
                    confidences.push(AI_NUTRITION_CONFIDENCE);
                    return (nutrients, NutrientSource::Ai);
                }
                match typical_values(&item.name) {
                    Some(per_100g) => {
                        confidences.push(TABLE_NUTRITION_CONFIDENCE);
                        (per_100g.for_portion(item.portion_grams), NutrientSource::Estimate)
                    }
                    None => {
                        confidences.push(GENERIC_NUTRITION_CONFIDENCE);
                        (GENERIC_PER_100G.for_portion(item.portion_grams), NutrientSource::Estimate)
                    }
                }
            })
            .collect();
        (estimates, mean(confidences.into_iter()))
    }

    /// Queries every database for every item concurrently. The first
    /// database in order with a hit wins.
    async fn lookup(&self, items: &[FoodItem]) -> Vec<Option<DatabaseHit>> {
        join_all(items.iter().map(|item| async move {
            let results = join_all(self.databases.iter().map(|db| db.search(&item.name))).await;
            results
                .into_iter()
                .zip(&self.databases)
                .find_map(|(result, db)| match result {
                    Ok(hit) => hit,
                    Err(e) => {
                        warn!("{:?} lookup failed: {}", db.source(), e);
                        None
                    }
                })
        }))
        .await
    }

    async fn alternatives(&self, names: &[String], totals: &Nutrients) -> (Vec<String>, ResultSource) {
        if self.ai.is_available() {
            let request = LlmRequest::new(ALTERNATIVES_SYSTEM, alternatives_prompt(names, totals))
                .json()
                .with_temperature(0.6);
            match self.ai.generate(&request).await {
                Ok(response) => {
                    let (mut list, source) = match extract_json(&response.text) {
                        Some(json) => (string_list(&json, "alternatives"), ResultSource::Ai),
                        None => (scrape_list(&response.text), ResultSource::AiText),
                    };
                    if !list.is_empty() {
                        list.truncate(MAX_ALTERNATIVES);
                        return (list, source);
                    }
                }
                Err(e) => warn!("Alternatives falling back to table: {}", e),
            }
        }
        let mut list = static_alternatives(names);
        list.truncate(MAX_ALTERNATIVES);
        (list, ResultSource::Fallback)
    }
}

fn decode_image(raw: &str, mime_type: Option<&str>) -> Result<ImageInput, FoodRecognitionError> {
    let image = ImageInput::from_base64(raw, mime_type.unwrap_or("image/jpeg"));
    if image.data.is_empty() {
        return Err(FoodRecognitionError::MissingInput);
    }
    let bytes = STANDARD
        .decode(image.data.as_bytes())
        .map_err(|_| FoodRecognitionError::InvalidImage)?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(FoodRecognitionError::ImageTooLarge(bytes.len(), MAX_IMAGE_BYTES));
    }
    Ok(image)
}

fn vision_prompt() -> String {
    "List every distinct food or drink visible in this image. Respond with JSON of the form \
     {\"items\": [{\"name\": \"grilled chicken breast\", \"portion_grams\": 150, \"confidence\": 0.8}]}. \
     Estimate portions in grams. Use an empty list if there is no food."
        .to_string()
}

fn nutrition_prompt(items: &[FoodItem]) -> String {
    let listing = items
        .iter()
        .map(|i| format!("- {} ({:.0} g)", i.name, i.portion_grams))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Estimate the nutrient content of each portion:\n{listing}\n\nRespond with JSON of the form \
         {{\"items\": [{{\"name\": \"...\", \"calories\": 0, \"protein_g\": 0, \"carbs_g\": 0, \"fat_g\": 0, \
         \"sugar_g\": 0, \"fiber_g\": 0, \"saturated_fat_g\": 0, \"sodium_mg\": 0}}]}} in the same order."
    )
}

fn alternatives_prompt(names: &[String], totals: &Nutrients) -> String {
    format!(
        "A meal contains: {}. Totals: {:.0} kcal, {:.1} g sugar, {:.1} g saturated fat, {:.0} mg sodium, \
         {:.1} g fibre. Suggest up to {MAX_ALTERNATIVES} healthier alternatives. Respond with JSON of the form \
         {{\"alternatives\": [\"...\"]}}.",
        names.join(", "),
        totals.calories,
        totals.sugar_g,
        totals.saturated_fat_g,
        totals.sodium_mg,
        totals.fiber_g
    )
}

/// Accepts `{"items": [...]}`, `{"foods": [...]}` or a bare array. Free-text
/// answers are scraped as bullet lists with default portions.
pub fn parse_food_items(text: &str) -> Vec<FoodItem> {
    let mut items: Vec<FoodItem> = match extract_json(text) {
        Some(json) => json
            .get("items")
            .or_else(|| json.get("foods"))
            .or(Some(&json))
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(food_item_from_json).collect())
            .unwrap_or_default(),
        None => scrape_list(text)
            .into_iter()
            .map(|name| FoodItem {
                name,
                portion_grams: DEFAULT_PORTION_GRAMS,
                confidence: SCRAPED_ITEM_CONFIDENCE,
            })
            .collect(),
    };
    items.truncate(MAX_ITEMS);
    items
}

fn food_item_from_json(value: &Value) -> Option<FoodItem> {
    let name = match value {
        Value::String(name) => name.trim().to_string(),
        _ => value.get("name")?.as_str()?.trim().to_string(),
    };
    if name.is_empty() {
        return None;
    }
    let portion_grams = number_field(value, "portion_grams")
        .or_else(|| number_field(value, "grams"))
        .filter(|g| *g > 0.0 && *g <= 5000.0)
        .unwrap_or(DEFAULT_PORTION_GRAMS);
    let confidence = number_field(value, "confidence")
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_ITEM_CONFIDENCE);
    Some(FoodItem { name, portion_grams, confidence })
}

/// The entry naming the item, else the one at the same position.
fn matching_entry<'a>(list: &'a [Value], name: &str, idx: usize) -> Option<&'a Value> {
    list.iter()
        .find(|v| {
            v.get("name")
                .and_then(Value::as_str)
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .or_else(|| list.get(idx))
}

fn nutrients_from_json(value: &Value) -> Option<Nutrients> {
    let field = |key: &str| number_field(value, key).filter(|v| *v >= 0.0);
    Some(Nutrients {
        calories: field("calories")?,
        protein_g: field("protein_g").unwrap_or(0.0),
        carbs_g: field("carbs_g").unwrap_or(0.0),
        fat_g: field("fat_g").unwrap_or(0.0),
        sugar_g: field("sugar_g").unwrap_or(0.0),
        fiber_g: field("fiber_g").unwrap_or(0.0),
        saturated_fat_g: field("saturated_fat_g").unwrap_or(0.0),
        sodium_mg: field("sodium_mg").unwrap_or(0.0),
    })
}

/// Scales recognised portions so they add up to the weighed total, keeping
/// the model's proportions between items.
fn scale_to_total(items: &mut [FoodItem], total_grams: f64) {
    let recognised: f64 = items.iter().map(|i| i.portion_grams).sum();
    if recognised <= 0.0 {
        return;
    }
    let factor = total_grams / recognised;
    for item in items.iter_mut() {
        item.portion_grams = (item.portion_grams * factor * 10.0).round() / 10.0;
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
