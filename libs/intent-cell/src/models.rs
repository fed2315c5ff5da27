use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    SymptomDescription,
    MedicationInquiry,
    AppointmentRequest,
    Emergency,
    FollowUpAnswer,
    GeneralHealthQuestion,
    Gratitude,
    Goodbye,
    ClarificationRequest,
}

impl Intent {
    pub const COUNT: usize = 10;

    pub const ALL: [Intent; Intent::COUNT] = [
        Intent::Greeting,
        Intent::SymptomDescription,
        Intent::MedicationInquiry,
        Intent::AppointmentRequest,
        Intent::Emergency,
        Intent::FollowUpAnswer,
        Intent::GeneralHealthQuestion,
        Intent::Gratitude,
        Intent::Goodbye,
        Intent::ClarificationRequest,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Intent {
        Intent::ALL[idx % Intent::COUNT]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::SymptomDescription => "symptom_description",
            Intent::MedicationInquiry => "medication_inquiry",
            Intent::AppointmentRequest => "appointment_request",
            Intent::Emergency => "emergency",
            Intent::FollowUpAnswer => "follow_up_answer",
            Intent::GeneralHealthQuestion => "general_health_question",
            Intent::Gratitude => "gratitude",
            Intent::Goodbye => "goodbye",
            Intent::ClarificationRequest => "clarification_request",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability per intent, indexed by `Intent::index`.
pub type Distribution = [f64; Intent::COUNT];

#[derive(Debug, Clone, Serialize)]
pub struct ClassifierVote {
    pub classifier: &'static str,
    pub intent: Intent,
    pub confidence: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntentScore {
    pub intent: Intent,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntentPrediction {
    pub intent: Intent,
    pub confidence: f64,
    pub low_confidence: bool,
    /// Number of classifiers whose top label matches the ensemble label.
    pub agreement: usize,
    pub votes: Vec<ClassifierVote>,
    pub probabilities: Vec<IntentScore>,
}

/// What the conversation looked like just before the utterance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnContext {
    pub previous_intent: Option<Intent>,
    #[serde(default)]
    pub bot_asked_question: bool,
}

#[derive(Debug, Deserialize)]
pub struct PredictIntentRequest {
    pub text: String,
    pub session_id: Option<String>,
    #[serde(default)]
    pub context: TurnContext,
}

#[derive(Debug, Serialize)]
pub struct PredictIntentResponse {
    pub prediction: IntentPrediction,
    pub likely_next: Vec<IntentScore>,
}

#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("Text too long: {0} characters (max {1})")]
    TextTooLong(usize, usize),
}

impl IntoResponse for IntentError {
    fn into_response(self) -> Response {
        let status = match self {
            IntentError::TextTooLong(..) => StatusCode::PAYLOAD_TOO_LARGE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trips_for_all_intents() {
        for (i, intent) in Intent::ALL.iter().enumerate() {
            assert_eq!(intent.index(), i);
            assert_eq!(Intent::from_index(i), *intent);
        }
    }

    #[test]
    fn test_serializes_as_snake_case_label() {
        let json = serde_json::to_string(&Intent::MedicationInquiry).unwrap();
        assert_eq!(json, format!("\"{}\"", Intent::MedicationInquiry.as_str()));
    }
}
