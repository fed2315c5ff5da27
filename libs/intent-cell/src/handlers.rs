use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::instrument;

use crate::models::{IntentError, PredictIntentRequest, PredictIntentResponse};
use crate::services::{IntentPredictionModel, PredictiveIntentEngine};

pub const MAX_TEXT_CHARS: usize = 2000;
const LIKELY_NEXT: usize = 3;

pub struct IntentHandlers {
    pub model: Arc<IntentPredictionModel>,
    pub engine: Arc<PredictiveIntentEngine>,
}

#[instrument(skip_all, fields(session_id = ?request.session_id))]
pub async fn predict_intent(
    State(handlers): State<Arc<IntentHandlers>>,
    Json(request): Json<PredictIntentRequest>,
) -> Result<Json<PredictIntentResponse>, IntentError> {
    let chars = request.text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(IntentError::TextTooLong(chars, MAX_TEXT_CHARS));
    }

    let mut context = request.context;
    if let Some(session_id) = &request.session_id {
        if context.previous_intent.is_none() {
            context.previous_intent = handlers.engine.last_intent(session_id).await;
        }
    }

    let prediction = handlers.model.predict_with_context(&request.text, &context);
    if let Some(session_id) = &request.session_id {
        handlers.engine.observe(session_id, prediction.intent).await;
    }

    let mut likely_next = handlers.engine.predict_next(prediction.intent).await;
    likely_next.truncate(LIKELY_NEXT);

    Ok(Json(PredictIntentResponse { prediction, likely_next }))
}
