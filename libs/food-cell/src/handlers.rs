use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::instrument;

use crate::models::{AnalyzeFoodRequest, FoodAnalysis, FoodRecognitionError, Recognition, RecognizeFoodRequest};
use crate::services::FoodRecognitionService;

#[instrument(skip_all)]
pub async fn recognize_food(
    State(service): State<Arc<FoodRecognitionService>>,
    Json(request): Json<RecognizeFoodRequest>,
) -> Result<Json<Recognition>, FoodRecognitionError> {
    let recognition = service
        .recognize(&request.image_base64, request.mime_type.as_deref())
        .await?;
    Ok(Json(recognition))
}

#[instrument(skip_all)]
pub async fn analyze_food(
    State(service): State<Arc<FoodRecognitionService>>,
    Json(request): Json<AnalyzeFoodRequest>,
) -> Result<Json<FoodAnalysis>, FoodRecognitionError> {
    Ok(Json(service.analyze(request).await?))
}
