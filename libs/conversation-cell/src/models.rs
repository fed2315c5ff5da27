use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use intent_cell::Intent;
use shared_models::clinical::{PatientContext, UrgencyLevel};
use soap_cell::{SoapError, SoapNote, Speaker, TranscriptTurn};
use symptom_cell::{SymptomAssessment, SymptomError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub speaker: Speaker,
    pub text: String,
    pub intent: Option<Intent>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: Uuid,
    pub patient: PatientContext,
    pub messages: Vec<ConversationMessage>,
    pub asked_questions: Vec<String>,
    pub assessment: Option<SymptomAssessment>,
    /// Set once the session has been counted in population analytics.
    pub analytics_recorded: bool,
    pub started_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(patient: PatientContext) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            patient,
            messages: Vec::new(),
            asked_questions: Vec::new(),
            assessment: None,
            analytics_recorded: false,
            started_at: now,
            last_active: now,
        }
    }

    pub fn urgency(&self) -> UrgencyLevel {
        self.assessment
            .as_ref()
            .map(|a| a.urgency.level)
            .unwrap_or_default()
    }

    /// Everything the patient said, in order.
    pub fn patient_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.speaker == Speaker::Patient)
            .map(|m| m.text.trim())
            .collect::<Vec<_>>()
            .join(". ")
    }

    pub fn transcript(&self) -> Vec<TranscriptTurn> {
        self.messages
            .iter()
            .map(|m| TranscriptTurn { speaker: m.speaker, text: m.text.clone() })
            .collect()
    }

    pub fn last_bot_asked_question(&self) -> bool {
        self.messages
            .iter()
            .rev()
            .find(|m| m.speaker == Speaker::Assistant)
            .is_some_and(|m| m.text.trim_end().ends_with('?'))
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>, intent: Option<Intent>) {
        let now = Utc::now();
        self.messages.push(ConversationMessage { speaker, text: text.into(), intent, timestamp: now });
        self.last_active = now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Ai,
    Canned,
    Emergency,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: Uuid,
    pub reply: String,
    pub intent: Intent,
    pub intent_confidence: f64,
    pub urgency: UrgencyLevel,
    pub follow_up_questions: Vec<String>,
    pub source: ReplySource,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub session_id: Uuid,
    pub message_count: usize,
    pub intents: Vec<Intent>,
    pub symptoms: Vec<String>,
    pub urgency: UrgencyLevel,
    pub possible_conditions: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub messages: Vec<ConversationMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartConversationRequest {
    #[serde(default)]
    pub patient: PatientContext,
}

#[derive(Debug, Serialize)]
pub struct StartConversationResponse {
    pub session_id: Uuid,
    pub greeting: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SoapQuery {
    #[serde(default)]
    pub enhance: bool,
}

#[derive(Debug, Serialize)]
pub struct ConversationSoapResponse {
    pub note: SoapNote,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(Uuid),
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Message too long: {0} characters (max {1})")]
    MessageTooLong(usize, usize),
    #[error(transparent)]
    Symptom(#[from] SymptomError),
    #[error(transparent)]
    Soap(#[from] SoapError),
}

impl IntoResponse for ConversationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ConversationError::NotFound(_) => StatusCode::NOT_FOUND,
            ConversationError::EmptyMessage => StatusCode::BAD_REQUEST,
            ConversationError::MessageTooLong(..) => StatusCode::PAYLOAD_TOO_LARGE,
            ConversationError::Symptom(_) | ConversationError::Soap(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
