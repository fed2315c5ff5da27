use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers::{self, IntentHandlers};
use crate::services::{IntentPredictionModel, PredictiveIntentEngine};

pub fn create_intent_router(
    model: Arc<IntentPredictionModel>,
    engine: Arc<PredictiveIntentEngine>,
) -> Router {
    let handlers = Arc::new(IntentHandlers { model, engine });

    Router::new()
        .route("/predict", post(handlers::predict_intent))
        .with_state(handlers)
}
