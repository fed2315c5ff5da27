use std::fmt::Write;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use shared_models::clinical::{PatientContext, UrgencyLevel};
use symptom_cell::{SymptomAssessment, SymptomError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Patient,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptTurn {
    pub fn patient(text: impl Into<String>) -> Self {
        Self { speaker: Speaker::Patient, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { speaker: Speaker::Assistant, text: text.into() }
    }
}

/// Vitals the patient reported themselves. Nothing here is measured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedVitals {
    pub temperature_c: Option<f64>,
    pub heart_rate_bpm: Option<u32>,
    pub blood_pressure: Option<String>,
    pub respiratory_rate: Option<u32>,
    pub oxygen_saturation: Option<u32>,
}

impl ReportedVitals {
    pub fn is_empty(&self) -> bool {
        *self == ReportedVitals::default()
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(t) = self.temperature_c {
            lines.push(format!("Temperature: {t:.1} °C (patient-reported)"));
        }
        if let Some(hr) = self.heart_rate_bpm {
            lines.push(format!("Heart rate: {hr} bpm (patient-reported)"));
        }
        if let Some(bp) = &self.blood_pressure {
            lines.push(format!("Blood pressure: {bp} mmHg (patient-reported)"));
        }
        if let Some(rr) = self.respiratory_rate {
            lines.push(format!("Respiratory rate: {rr}/min (patient-reported)"));
        }
        if let Some(spo2) = self.oxygen_saturation {
            lines.push(format!("Oxygen saturation: {spo2}% (patient-reported)"));
        }
        lines
    }
}

#[derive(Debug, Clone, Default)]
pub struct SoapInput {
    pub patient: PatientContext,
    pub transcript: Vec<TranscriptTurn>,
    pub vitals: Option<ReportedVitals>,
    /// Reused when the caller already assessed the transcript.
    pub assessment: Option<SymptomAssessment>,
}

// ==============================================================================
// SOAP NOTE
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subjective {
    pub chief_complaint: String,
    pub history_of_present_illness: String,
    pub reported_history: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub vitals: Option<ReportedVitals>,
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub symptoms: Vec<String>,
    pub patterns: Vec<String>,
    pub differential: Vec<String>,
    pub red_flags: Vec<String>,
    pub urgency: UrgencyLevel,
    pub urgency_score: f64,
    pub ai_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub recommendations: Vec<String>,
    pub relief: Vec<String>,
    pub follow_up: String,
    pub return_precautions: Vec<String>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoapNote {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub subjective: Subjective,
    pub objective: Objective,
    pub assessment: Assessment,
    pub plan: Plan,
}

fn bullets(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{label}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None reported".to_string()
    } else {
        items.join(", ")
    }
}

impl SoapNote {
    /// Plain-text rendering with the four headed sections.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let s = &self.subjective;
        let _ = writeln!(out, "SUBJECTIVE");
        let _ = writeln!(out, "Chief complaint: {}", s.chief_complaint);
        let _ = writeln!(out, "History of present illness: {}", s.history_of_present_illness);
        bullets(&mut out, "Reported history", &s.reported_history);
        let _ = writeln!(out, "Medications: {}", or_none(&s.medications));
        let _ = writeln!(out, "Allergies: {}", or_none(&s.allergies));

        let _ = writeln!(out, "\nOBJECTIVE");
        if let Some(vitals) = &self.objective.vitals {
            for line in vitals.lines() {
                let _ = writeln!(out, "{line}");
            }
        }
        for line in &self.objective.observations {
            let _ = writeln!(out, "{line}");
        }

        let a = &self.assessment;
        let _ = writeln!(out, "\nASSESSMENT");
        bullets(&mut out, "Symptoms", &a.symptoms);
        bullets(&mut out, "Patterns", &a.patterns);
        bullets(&mut out, "Differential considerations", &a.differential);
        bullets(&mut out, "Red flags", &a.red_flags);
        let _ = writeln!(out, "Urgency: {} (score {:.2})", a.urgency, a.urgency_score);
        if let Some(summary) = &a.ai_summary {
            let _ = writeln!(out, "Clinical summary: {summary}");
        }

        let p = &self.plan;
        let _ = writeln!(out, "\nPLAN");
        bullets(&mut out, "Recommendations", &p.recommendations);
        bullets(&mut out, "Relief measures", &p.relief);
        let _ = writeln!(out, "Follow-up: {}", p.follow_up);
        bullets(&mut out, "Return precautions", &p.return_precautions);
        let _ = write!(out, "\n{}", p.disclaimer);
        out
    }
}

// ==============================================================================
// HTTP
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateSoapRequest {
    #[serde(default)]
    pub patient: PatientContext,
    pub transcript: Vec<TranscriptTurn>,
    pub vitals: Option<ReportedVitals>,
    #[serde(default)]
    pub enhance: bool,
}

#[derive(Debug, Serialize)]
pub struct SoapNoteResponse {
    pub note: SoapNote,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SoapError {
    #[error("Transcript has no patient messages")]
    EmptyTranscript,
    #[error(transparent)]
    Assessment(#[from] SymptomError),
}

impl IntoResponse for SoapError {
    fn into_response(self) -> Response {
        let status = match self {
            SoapError::EmptyTranscript => StatusCode::BAD_REQUEST,
            SoapError::Assessment(inner) => return inner.into_response(),
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
