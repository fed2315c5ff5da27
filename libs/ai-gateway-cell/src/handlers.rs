use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::instrument;

use crate::error::AiGatewayError;
use crate::models::{
    FoodSuggestionRequest, FoodSuggestions, GatewayStatus, GoalPlan, GoalRequest, NutritionPlan,
    NutritionPlanRequest,
};
use crate::services::{AiServiceManager, NutritionAdvisor};

pub struct AiHandlers {
    pub manager: Arc<AiServiceManager>,
    pub advisor: NutritionAdvisor,
}

impl AiHandlers {
    pub fn new(manager: Arc<AiServiceManager>) -> Self {
        Self {
            advisor: NutritionAdvisor::new(manager.clone()),
            manager,
        }
    }
}

#[instrument(skip_all)]
pub async fn generate_nutrition_plan(
    State(handlers): State<Arc<AiHandlers>>,
    Json(request): Json<NutritionPlanRequest>,
) -> Result<Json<NutritionPlan>, AiGatewayError> {
    let plan = handlers.advisor.generate_nutrition_plan(request).await?;
    Ok(Json(plan))
}

#[instrument(skip_all)]
pub async fn generate_goal_plan(
    State(handlers): State<Arc<AiHandlers>>,
    Json(request): Json<GoalRequest>,
) -> Result<Json<GoalPlan>, AiGatewayError> {
    let plan = handlers.advisor.generate_goal_plan(request).await?;
    Ok(Json(plan))
}

#[instrument(skip_all)]
pub async fn suggest_foods(
    State(handlers): State<Arc<AiHandlers>>,
    Json(request): Json<FoodSuggestionRequest>,
) -> Result<Json<FoodSuggestions>, AiGatewayError> {
    let suggestions = handlers.advisor.suggest_foods(request).await?;
    Ok(Json(suggestions))
}

pub async fn get_provider_status(State(handlers): State<Arc<AiHandlers>>) -> Json<GatewayStatus> {
    Json(handlers.manager.status().await)
}
