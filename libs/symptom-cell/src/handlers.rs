use axum::Json;
use tracing::instrument;

use crate::models::{
    ActionPlan, AnalyzeRequest, AssessmentResponse, MedicalResponse, SymptomAssessmentRequest,
    SymptomError,
};
use crate::services::{action_plan, recommend_relief, MedicalResponseGenerator, SymptomAssessmentEngine};

#[instrument(skip_all)]
pub async fn analyze_symptoms(
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<MedicalResponse>, SymptomError> {
    let response = MedicalResponseGenerator::new().generate_response(&request.text, &request.patient)?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn assess_symptoms(
    Json(request): Json<SymptomAssessmentRequest>,
) -> Result<Json<AssessmentResponse>, SymptomError> {
    let assessment = SymptomAssessmentEngine::new().assess(&request)?;
    let relief = recommend_relief(&assessment);
    Ok(Json(AssessmentResponse { assessment, relief }))
}

#[instrument(skip_all)]
pub async fn create_action_plan(
    Json(request): Json<SymptomAssessmentRequest>,
) -> Result<Json<ActionPlan>, SymptomError> {
    let assessment = SymptomAssessmentEngine::new().assess(&request)?;
    Ok(Json(action_plan(&assessment)))
}
