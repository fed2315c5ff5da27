// =====================================================================================
// NUTRITION, GOAL AND FOOD-SUGGESTION PLANNERS
// =====================================================================================

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use shared_utils::llm_json::{extract_json, number_field, scrape_list, scrape_number, string_list};

use crate::error::AiGatewayError;
use crate::models::{
    FoodSuggestionRequest, FoodSuggestions, GoalMilestone, GoalPlan, GoalRequest, LlmRequest,
    MacroTargets, NutritionPlan, NutritionPlanRequest, ResultSource,
};
use crate::services::fallbacks::{self, FallbackPlan};
use crate::services::manager::AiServiceManager;
use crate::services::prompts;

const MAX_SAFE_WEEKLY_CHANGE_KG: f64 = 1.0;
const MIN_DAILY_KCAL: f64 = 1200.0;

pub struct NutritionAdvisor {
    manager: Arc<AiServiceManager>,
}

impl NutritionAdvisor {
    pub fn new(manager: Arc<AiServiceManager>) -> Self {
        Self { manager }
    }

    #[instrument(skip(self, request))]
    pub async fn generate_nutrition_plan(
        &self,
        request: NutritionPlanRequest,
    ) -> Result<NutritionPlan, AiGatewayError> {
        validate_body_metrics(request.weight_kg, request.height_cm)?;

        let goal = request.goal.clone().unwrap_or_else(|| "general health".to_string());
        let baseline = estimate_daily_calories(&request);
        let fallback = fallbacks::plan_for(&goal, &request.conditions);

        let llm_request = LlmRequest::new(
            prompts::NUTRITIONIST_SYSTEM,
            prompts::nutrition_plan_prompt(&request, baseline),
        )
        .json()
        .with_temperature(0.5);

        let response = match self.manager.generate(&llm_request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Nutrition plan falling back to static table: {}", e);
                return Ok(fallback_nutrition_plan(goal, baseline, fallback));
            }
        };

        let plan = match extract_json(&response.text) {
            Some(json) => {
                let kcal = number_field(&json, "daily_calories")
                    .map(|k| k.round() as u32)
                    .or(baseline);
                NutritionPlan {
                    macros: macros_from_json(&json).or_else(|| kcal.map(|k| split_macros(k, &request.conditions))),
                    daily_calories: kcal,
                    recommended_foods: or_fallback(string_list(&json, "recommended_foods"), fallback.recommended_foods),
                    foods_to_avoid: or_fallback(string_list(&json, "foods_to_avoid"), fallback.foods_to_avoid),
                    meal_ideas: or_fallback(string_list(&json, "meal_ideas"), fallback.meal_ideas),
                    tips: or_fallback(string_list(&json, "tips"), fallback.tips),
                    goal,
                    source: ResultSource::Ai,
                    provider: Some(response.provider),
                }
            }
            None => {
                debug!("Nutrition answer was not JSON, scraping text");
                let kcal = scrape_number(&response.text, "calories")
                    .map(|k| k.round() as u32)
                    .or(baseline);
                NutritionPlan {
                    macros: kcal.map(|k| split_macros(k, &request.conditions)),
                    daily_calories: kcal,
                    recommended_foods: or_fallback(scrape_list(&response.text), fallback.recommended_foods),
                    foods_to_avoid: to_owned(fallback.foods_to_avoid),
                    meal_ideas: to_owned(fallback.meal_ideas),
                    tips: to_owned(fallback.tips),
                    goal,
                    source: ResultSource::AiText,
                    provider: Some(response.provider),
                }
            }
        };

        Ok(plan)
    }

    #[instrument(skip(self, request))]
    pub async fn generate_goal_plan(&self, request: GoalRequest) -> Result<GoalPlan, AiGatewayError> {
        if request.goal.trim().is_empty() {
            return Err(AiGatewayError::InvalidRequest("goal must not be empty".to_string()));
        }
        if request.timeframe_weeks == Some(0) {
            return Err(AiGatewayError::InvalidRequest("timeframe_weeks must be positive".to_string()));
        }

        let weekly_change = weekly_change_kg(&request);
        let computed_realistic = weekly_change.map(|c| c.abs() <= MAX_SAFE_WEEKLY_CHANGE_KG);

        let llm_request = LlmRequest::new(prompts::COACH_SYSTEM, prompts::goal_prompt(&request))
            .json()
            .with_temperature(0.4);

        match self.manager.generate(&llm_request).await {
            Ok(response) => {
                if let Some(json) = extract_json(&response.text) {
                    let milestones = milestones_from_json(&json);
                    return Ok(GoalPlan {
                        weekly_change_kg: weekly_change,
                        realistic: computed_realistic
                            .or_else(|| json.get("realistic").and_then(Value::as_bool))
                            .unwrap_or(true),
                        milestones: if milestones.is_empty() { linear_milestones(&request) } else { milestones },
                        habits: or_fallback(string_list(&json, "habits"), fallbacks::goal_habits(&request.goal)),
                        goal: request.goal,
                        source: ResultSource::Ai,
                        provider: Some(response.provider),
                    });
                }
                Ok(GoalPlan {
                    weekly_change_kg: weekly_change,
                    realistic: computed_realistic.unwrap_or(true),
                    milestones: linear_milestones(&request),
                    habits: or_fallback(scrape_list(&response.text), fallbacks::goal_habits(&request.goal)),
                    goal: request.goal,
                    source: ResultSource::AiText,
                    provider: Some(response.provider),
                })
            }
            Err(e) => {
                warn!("Goal plan falling back to static habits: {}", e);
                Ok(GoalPlan {
                    weekly_change_kg: weekly_change,
                    realistic: computed_realistic.unwrap_or(true),
                    milestones: linear_milestones(&request),
                    habits: to_owned(fallbacks::goal_habits(&request.goal)),
                    goal: request.goal,
                    source: ResultSource::Fallback,
                    provider: None,
                })
            }
        }
    }

    #[instrument(skip(self, request))]
    pub async fn suggest_foods(
        &self,
        request: FoodSuggestionRequest,
    ) -> Result<FoodSuggestions, AiGatewayError> {
        let goal = request.goal.clone().unwrap_or_default();
        let fallback = fallbacks::plan_for(&goal, &request.conditions);
        let llm_request = LlmRequest::new(
            prompts::NUTRITIONIST_SYSTEM,
            prompts::food_suggestion_prompt(&request),
        )
        .json()
        .with_temperature(0.7);

        let (suggestions, rationale, source, provider) = match self.manager.generate(&llm_request).await {
            Ok(response) => match extract_json(&response.text) {
                Some(json) => (
                    string_list(&json, "suggestions"),
                    json.get("rationale").and_then(Value::as_str).map(str::to_string),
                    ResultSource::Ai,
                    Some(response.provider),
                ),
                None => (scrape_list(&response.text), None, ResultSource::AiText, Some(response.provider)),
            },
            Err(e) => {
                warn!("Food suggestions falling back to static table: {}", e);
                (Vec::new(), None, ResultSource::Fallback, None)
            }
        };

        let mut suggestions = exclude_items(suggestions, &request.exclude);
        let mut source = source;
        if suggestions.is_empty() {
            let mut pool = to_owned(fallback.recommended_foods);
            pool.extend(to_owned(fallback.meal_ideas));
            suggestions = exclude_items(pool, &request.exclude);
            source = ResultSource::Fallback;
        }
        suggestions.truncate(6);

        Ok(FoodSuggestions {
            suggestions,
            rationale,
            provider: if source == ResultSource::Fallback { None } else { provider },
            source,
        })
    }
}

fn validate_body_metrics(weight_kg: Option<f64>, height_cm: Option<f64>) -> Result<(), AiGatewayError> {
    if weight_kg.is_some_and(|w| !(20.0..=400.0).contains(&w)) {
        return Err(AiGatewayError::InvalidRequest("weight_kg out of range".to_string()));
    }
    if height_cm.is_some_and(|h| !(80.0..=250.0).contains(&h)) {
        return Err(AiGatewayError::InvalidRequest("height_cm out of range".to_string()));
    }
    Ok(())
}

fn activity_factor(level: Option<&str>) -> f64 {
    match level.map(|l| l.to_lowercase().replace([' ', '-'], "_")).as_deref() {
        Some("sedentary") => 1.2,
        Some("light") | Some("lightly_active") => 1.375,
        Some("moderate") | Some("moderately_active") => 1.55,
        Some("very_active") | Some("active") => 1.725,
        Some("extra_active") | Some("athlete") => 1.9,
        _ => 1.375,
    }
}

/// Mifflin-St Jeor resting energy times an activity factor, adjusted for
/// weight goals. `None` when weight, height or age is missing.
pub fn estimate_daily_calories(request: &NutritionPlanRequest) -> Option<u32> {
    let weight = request.weight_kg?;
    let height = request.height_cm?;
    let age = f64::from(request.age?);

    let sex_offset = match request.sex.as_deref().map(str::to_lowercase).as_deref() {
        Some("male") | Some("m") => 5.0,
        Some("female") | Some("f") => -161.0,
        _ => -78.0,
    };
    let bmr = 10.0 * weight + 6.25 * height - 5.0 * age + sex_offset;
    let mut kcal = bmr * activity_factor(request.activity_level.as_deref());

    let goal = request.goal.as_deref().unwrap_or_default().to_lowercase();
    if goal.contains("loss") || goal.contains("lose") {
        kcal = (kcal - 500.0).max(MIN_DAILY_KCAL);
    } else if goal.contains("gain") || goal.contains("muscle") {
        kcal += 300.0;
    }

    Some((kcal / 10.0).round() as u32 * 10)
}

/// Protein/carb/fat split, with lower carbohydrate share for diabetes.
pub fn split_macros(kcal: u32, conditions: &[String]) -> MacroTargets {
    let diabetic = conditions.iter().any(|c| c.to_lowercase().contains("diabet"));
    let (protein, carbs, fat) = if diabetic { (0.25, 0.40, 0.35) } else { (0.25, 0.45, 0.30) };
    let kcal = f64::from(kcal);
    MacroTargets {
        protein_g: (kcal * protein / 4.0).round() as u32,
        carbs_g: (kcal * carbs / 4.0).round() as u32,
        fat_g: (kcal * fat / 9.0).round() as u32,
    }
}

fn macros_from_json(json: &Value) -> Option<MacroTargets> {
    Some(MacroTargets {
        protein_g: number_field(json, "protein_g")?.round() as u32,
        carbs_g: number_field(json, "carbs_g")?.round() as u32,
        fat_g: number_field(json, "fat_g")?.round() as u32,
    })
}

fn weekly_change_kg(request: &GoalRequest) -> Option<f64> {
    let current = request.current_weight_kg?;
    let target = request.target_weight_kg?;
    let weeks = f64::from(request.timeframe_weeks?);
    Some(((target - current) / weeks * 100.0).round() / 100.0)
}

fn linear_milestones(request: &GoalRequest) -> Vec<GoalMilestone> {
    let (Some(current), Some(target), Some(weeks)) =
        (request.current_weight_kg, request.target_weight_kg, request.timeframe_weeks)
    else {
        return vec![
            GoalMilestone { week: 2, target: format!("Establish first habit toward: {}", request.goal) },
            GoalMilestone { week: 6, target: "Review progress and adjust".to_string() },
        ];
    };

    let step = (weeks / 4).max(1);
    (1..=weeks)
        .filter(|w| w % step == 0 || *w == weeks)
        .map(|week| {
            let fraction = f64::from(week) / f64::from(weeks);
            GoalMilestone {
                week,
                target: format!("{:.1} kg", current + (target - current) * fraction),
            }
        })
        .collect()
}

fn milestones_from_json(json: &Value) -> Vec<GoalMilestone> {
    json.get("milestones")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(GoalMilestone {
                        week: item.get("week")?.as_u64()? as u32,
                        target: item.get("target")?.as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn or_fallback(items: Vec<String>, fallback: &[&str]) -> Vec<String> {
    if items.is_empty() {
        to_owned(fallback)
    } else {
        items
    }
}

fn exclude_items(items: Vec<String>, exclude: &[String]) -> Vec<String> {
    let exclude: Vec<String> = exclude.iter().map(|e| e.to_lowercase()).collect();
    items
        .into_iter()
        .filter(|item| {
            let lower = item.to_lowercase();
            !exclude.iter().any(|e| !e.is_empty() && lower.contains(e))
        })
        .collect()
}

fn fallback_nutrition_plan(goal: String, baseline: Option<u32>, fallback: &FallbackPlan) -> NutritionPlan {
    NutritionPlan {
        goal,
        daily_calories: baseline,
        macros: baseline.map(|k| split_macros(k, &[])),
        recommended_foods: to_owned(fallback.recommended_foods),
        foods_to_avoid: to_owned(fallback.foods_to_avoid),
        meal_ideas: to_owned(fallback.meal_ideas),
        tips: to_owned(fallback.tips),
        source: ResultSource::Fallback,
        provider: None,
    }
}
