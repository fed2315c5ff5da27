use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, AiHandlers};
use crate::services::AiServiceManager;

pub fn create_ai_router(manager: Arc<AiServiceManager>) -> Router {
    let handlers = Arc::new(AiHandlers::new(manager));

    Router::new()
        .route("/nutrition-plan", post(handlers::generate_nutrition_plan))
        .route("/goals", post(handlers::generate_goal_plan))
        .route("/food-suggestions", post(handlers::suggest_foods))
        .route("/providers", get(handlers::get_provider_status))
        .with_state(handlers)
}
