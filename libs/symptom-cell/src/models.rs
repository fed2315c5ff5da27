use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use shared_models::clinical::{PatientContext, Severity, UrgencyLevel};

// ==============================================================================
// SYMPTOM CATEGORIES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomCategory {
    Headache,
    ChestPain,
    ShortnessOfBreath,
    AbdominalPain,
    Fever,
    Cough,
    NauseaVomiting,
    Dizziness,
    Fatigue,
    BackPain,
    JointPain,
    SkinRash,
    SoreThroat,
    AnxietyMood,
    Urinary,
}

impl SymptomCategory {
    pub const ALL: [SymptomCategory; 15] = [
        SymptomCategory::Headache,
        SymptomCategory::ChestPain,
        SymptomCategory::ShortnessOfBreath,
        SymptomCategory::AbdominalPain,
        SymptomCategory::Fever,
        SymptomCategory::Cough,
        SymptomCategory::NauseaVomiting,
        SymptomCategory::Dizziness,
        SymptomCategory::Fatigue,
        SymptomCategory::BackPain,
        SymptomCategory::JointPain,
        SymptomCategory::SkinRash,
        SymptomCategory::SoreThroat,
        SymptomCategory::AnxietyMood,
        SymptomCategory::Urinary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomCategory::Headache => "headache",
            SymptomCategory::ChestPain => "chest_pain",
            SymptomCategory::ShortnessOfBreath => "shortness_of_breath",
            SymptomCategory::AbdominalPain => "abdominal_pain",
            SymptomCategory::Fever => "fever",
            SymptomCategory::Cough => "cough",
            SymptomCategory::NauseaVomiting => "nausea_vomiting",
            SymptomCategory::Dizziness => "dizziness",
            SymptomCategory::Fatigue => "fatigue",
            SymptomCategory::BackPain => "back_pain",
            SymptomCategory::JointPain => "joint_pain",
            SymptomCategory::SkinRash => "skin_rash",
            SymptomCategory::SoreThroat => "sore_throat",
            SymptomCategory::AnxietyMood => "anxiety_mood",
            SymptomCategory::Urinary => "urinary",
        }
    }

    /// Human-readable name for patient-facing text.
    pub fn display_name(&self) -> &'static str {
        match self {
            SymptomCategory::Headache => "headache",
            SymptomCategory::ChestPain => "chest pain",
            SymptomCategory::ShortnessOfBreath => "shortness of breath",
            SymptomCategory::AbdominalPain => "abdominal pain",
            SymptomCategory::Fever => "fever",
            SymptomCategory::Cough => "cough",
            SymptomCategory::NauseaVomiting => "nausea or vomiting",
            SymptomCategory::Dizziness => "dizziness",
            SymptomCategory::Fatigue => "fatigue",
            SymptomCategory::BackPain => "back pain",
            SymptomCategory::JointPain => "joint pain",
            SymptomCategory::SkinRash => "skin rash",
            SymptomCategory::SoreThroat => "sore throat",
            SymptomCategory::AnxietyMood => "anxiety or low mood",
            SymptomCategory::Urinary => "urinary symptoms",
        }
    }
}

impl fmt::Display for SymptomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a protocol question asks about, so answered topics can be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTopic {
    Onset,
    Severity,
    Location,
    Character,
    Associated,
    History,
}

// ==============================================================================
// EXTRACTION OUTPUT
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomDuration {
    /// The phrase as written, e.g. "for 3 days".
    pub text: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomMention {
    pub category: SymptomCategory,
    pub keywords: Vec<String>,
    pub severity: Severity,
    /// True when a modifier or pain rating set the severity.
    pub severity_stated: bool,
    pub pain_scale: Option<u8>,
    pub duration: Option<SymptomDuration>,
    pub location: Option<String>,
    pub negated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomRelationship {
    pub pattern: String,
    pub description: String,
    pub categories: Vec<SymptomCategory>,
    /// Matched elements over required elements.
    pub strength: f64,
}

impl SymptomRelationship {
    pub fn is_strong(&self) -> bool {
        self.strength >= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlagLevel {
    Urgent,
    Emergency,
}

impl RedFlagLevel {
    pub fn urgency(&self) -> UrgencyLevel {
        match self {
            RedFlagLevel::Urgent => UrgencyLevel::Urgent,
            RedFlagLevel::Emergency => UrgencyLevel::Emergency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedFlag {
    pub phrase: String,
    pub level: RedFlagLevel,
    pub category: Option<SymptomCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrgencyAssessment {
    pub score: f64,
    pub level: UrgencyLevel,
    pub factors: Vec<String>,
}

// ==============================================================================
// RESPONSES
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MedicalResponse {
    pub summary: String,
    pub symptoms: Vec<SymptomMention>,
    pub relationships: Vec<SymptomRelationship>,
    pub follow_up_questions: Vec<String>,
    pub red_flags_detected: Vec<RedFlag>,
    pub red_flags_to_watch: Vec<String>,
    pub urgency: UrgencyAssessment,
    pub care_advice: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub patient: PatientContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymptomAssessmentRequest {
    pub description: String,
    #[serde(default)]
    pub patient: PatientContext,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymptomAssessment {
    pub id: Uuid,
    pub symptoms: Vec<SymptomMention>,
    pub relationships: Vec<SymptomRelationship>,
    pub red_flags: Vec<RedFlag>,
    pub urgency: UrgencyAssessment,
    pub possible_conditions: Vec<String>,
    pub follow_up_questions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SymptomAssessment {
    /// Mentions that were not negated.
    pub fn active_symptoms(&self) -> impl Iterator<Item = &SymptomMention> {
        self.symptoms.iter().filter(|m| !m.negated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliefKind {
    SelfCare,
    SeekCare,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReliefRecommendation {
    pub kind: ReliefKind,
    pub category: Option<SymptomCategory>,
    pub title: String,
    pub measures: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    pub assessment: SymptomAssessment,
    pub relief: Vec<ReliefRecommendation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionStep {
    /// Day 0 means right now.
    pub day: u8,
    pub title: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionPlan {
    pub urgency: UrgencyLevel,
    pub steps: Vec<ActionStep>,
    pub warning_signs: Vec<String>,
    pub follow_up_hours: u32,
    pub disclaimer: String,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SymptomError {
    #[error("Symptom description is empty")]
    EmptyDescription,
    #[error("Symptom description too long: {0} characters (max {1})")]
    DescriptionTooLong(usize, usize),
}

impl IntoResponse for SymptomError {
    fn into_response(self) -> Response {
        let status = match self {
            SymptomError::EmptyDescription => StatusCode::BAD_REQUEST,
            SymptomError::DescriptionTooLong(..) => StatusCode::PAYLOAD_TOO_LARGE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
