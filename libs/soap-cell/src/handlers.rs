use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::instrument;

use crate::models::{GenerateSoapRequest, SoapError, SoapInput, SoapNoteResponse};
use crate::services::SoapGenerator;

#[instrument(skip_all, fields(enhance = request.enhance))]
pub async fn generate_soap_note(
    State(generator): State<Arc<SoapGenerator>>,
    Json(request): Json<GenerateSoapRequest>,
) -> Result<Json<SoapNoteResponse>, SoapError> {
    let input = SoapInput {
        patient: request.patient,
        transcript: request.transcript,
        vitals: request.vitals,
        assessment: None,
    };
    let mut note = generator.generate(&input)?;
    if request.enhance {
        note = generator.enhance_with_ai(note).await;
    }
    let text = note.to_text();
    Ok(Json(SoapNoteResponse { note, text }))
}
