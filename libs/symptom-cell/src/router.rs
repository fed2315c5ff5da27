use axum::{routing::post, Router};

use crate::handlers;

pub fn create_symptom_router() -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze_symptoms))
        .route("/assess", post(handlers::assess_symptoms))
        .route("/action-plan", post(handlers::create_action_plan))
}
