// =====================================================================================
// SOAP CELL - CLINICAL NOTE GENERATION
// =====================================================================================
//
// Assembles Subjective / Objective / Assessment / Plan notes from a patient
// conversation and the symptom assessment over it. An AI-written summary can
// be appended when a model is reachable.
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{ReportedVitals, SoapError, SoapInput, SoapNote, Speaker, TranscriptTurn};
pub use router::create_soap_router;
pub use services::SoapGenerator;
