use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers;
use crate::services::FoodRecognitionService;

pub fn create_food_router(service: Arc<FoodRecognitionService>) -> Router {
    Router::new()
        .route("/recognize", post(handlers::recognize_food))
        .route("/analyze", post(handlers::analyze_food))
        .with_state(service)
}
