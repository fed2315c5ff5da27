// =====================================================================================
// SYMPTOM CELL - SYMPTOM EXTRACTION, TRIAGE AND SELF-CARE PLANNING
// =====================================================================================
//
// Keyword and regex based extraction of multiple symptoms from free text,
// cluster rules relating them, red-flag detection and a weighted urgency
// score, plus relief advice and short action plans built on the result.
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    ActionPlan, MedicalResponse, SymptomAssessment, SymptomCategory, SymptomError, SymptomMention,
    UrgencyAssessment,
};
pub use router::create_symptom_router;
pub use services::{MedicalResponseGenerator, SymptomAssessmentEngine};
