// =====================================================================================
// CHAT SERVICE - ONE PATIENT MESSAGE IN, ONE ASSISTANT REPLY OUT
// =====================================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use ai_gateway_cell::{AiServiceManager, LlmRequest};
use analytics_cell::{Observation, PopulationAnalytics};
use intent_cell::{Intent, IntentPredictionModel, PredictiveIntentEngine, TurnContext};
use shared_models::clinical::{PatientContext, UrgencyLevel};
use shared_utils::text::tail_chars;
use soap_cell::{SoapGenerator, SoapInput, SoapNote, Speaker};
use symptom_cell::services::engine::MAX_DESCRIPTION_CHARS;
use symptom_cell::{SymptomAssessment, SymptomAssessmentEngine};

use super::store::SessionStore;
use crate::models::{
    ChatReply, ConversationError, ConversationSession, ConversationSummary, ReplySource,
};

pub const MAX_MESSAGE_CHARS: usize = 2000;
/// Messages of recent history included in the model prompt.
const PROMPT_HISTORY: usize = 6;

pub const GREETING: &str = "Hello, I'm a virtual health assistant. I can help you describe \
your symptoms and suggest what kind of care may be appropriate, but I can't diagnose. If this \
is an emergency, call your local emergency number now. What brings you here today?";

pub const EMERGENCY_REPLY: &str = "What you describe may need emergency care. Please call your \
local emergency number (911 in the US, 112 in Europe) or go to the nearest emergency department \
now. If someone is with you, ask them to stay with you until help arrives.";

const REPLY_SYSTEM: &str = "You are a warm, careful virtual health assistant talking with a \
patient. Acknowledge what they said in one or two short sentences, never diagnose, never \
prescribe, and keep the reply under 80 words.";

pub struct ChatService {
    store: Arc<SessionStore>,
    intents: Arc<IntentPredictionModel>,
    predictive: Arc<PredictiveIntentEngine>,
    engine: SymptomAssessmentEngine,
    ai: Arc<AiServiceManager>,
    soap: SoapGenerator,
    analytics: Arc<PopulationAnalytics>,
}

impl ChatService {
    pub fn new(
        store: Arc<SessionStore>,
        intents: Arc<IntentPredictionModel>,
        predictive: Arc<PredictiveIntentEngine>,
        ai: Arc<AiServiceManager>,
        analytics: Arc<PopulationAnalytics>,
    ) -> Self {
        Self {
            store,
            intents,
            predictive,
            engine: SymptomAssessmentEngine::new(),
            soap: SoapGenerator::with_ai(ai.clone()),
            ai,
            analytics,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub async fn start(&self, patient: PatientContext) -> ConversationSession {
        let mut session = ConversationSession::new(patient);
        session.push(Speaker::Assistant, GREETING, None);
        if let Some(evicted) = self.store.insert(session.clone()).await {
            self.predictive.forget(&evicted.to_string()).await;
        }
        info!(session_id = %session.id, "Conversation started");
        session
    }

    #[instrument(skip(self, text), fields(session_id = %id))]
    pub async fn handle_message(&self, id: Uuid, text: &str) -> Result<ChatReply, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }
        let chars = text.chars().count();
        if chars > MAX_MESSAGE_CHARS {
            return Err(ConversationError::MessageTooLong(chars, MAX_MESSAGE_CHARS));
        }

        let session = self.store.get(id).await.ok_or(ConversationError::NotFound(id))?;
        let key = id.to_string();

        let context = TurnContext {
            previous_intent: self.predictive.last_intent(&key).await,
            bot_asked_question: session.last_bot_asked_question(),
        };
        let prediction = self.intents.predict_with_context(text, &context);
        self.predictive.observe(&key, prediction.intent).await;

        // Every patient message so far, so symptoms mentioned in earlier
        // turns still count.
        let history = session.patient_text();
        let accumulated = if history.is_empty() {
            text.to_string()
        } else {
            format!("{history}. {text}")
        };
        let assessment = self.engine.assess_with_asked(
            tail_chars(&accumulated, MAX_DESCRIPTION_CHARS),
            &session.patient,
            &session.asked_questions,
        )?;

        let emergency = prediction.intent == Intent::Emergency
            || assessment.urgency.level == UrgencyLevel::Emergency;
        let urgency = if emergency { UrgencyLevel::Emergency } else { assessment.urgency.level };
        debug!(intent = %prediction.intent, confidence = prediction.confidence, %urgency, "Message classified");

        let (reply, source, asked) = if emergency {
            warn!("Emergency reply sent");
            (EMERGENCY_REPLY.to_string(), ReplySource::Emergency, None)
        } else {
            let question = next_question(prediction.intent, &assessment);
            let generated = self
                .ai_reply(&session, text, prediction.intent, &assessment, question.as_deref())
                .await;
            match generated {
                Some(reply) => (reply, ReplySource::Ai, question),
                None => (
                    canned_reply(prediction.intent, &assessment, question.as_deref()),
                    ReplySource::Canned,
                    question,
                ),
            }
        };

        let follow_up_questions = assessment
            .follow_up_questions
            .iter()
            .filter(|q| Some(*q) != asked.as_ref())
            .cloned()
            .collect();

        let intent = prediction.intent;
        let stored_reply = reply.clone();
        self.store
            .update(id, move |s| {
                s.push(Speaker::Patient, text, Some(intent));
                s.push(Speaker::Assistant, stored_reply, None);
                if let Some(question) = asked {
                    if !s.asked_questions.contains(&question) {
                        s.asked_questions.push(question);
                    }
                }
                s.assessment = Some(assessment);
            })
            .await
            .ok_or(ConversationError::NotFound(id))?;

        Ok(ChatReply {
            session_id: id,
            reply,
            intent,
            intent_confidence: prediction.confidence,
            urgency,
            follow_up_questions,
            source,
        })
    }

    async fn ai_reply(
        &self,
        session: &ConversationSession,
        text: &str,
        intent: Intent,
        assessment: &SymptomAssessment,
        question: Option<&str>,
    ) -> Option<String> {
        if !self.ai.is_available() {
            return None;
        }

        let mut prompt = String::from("Conversation so far:\n");
        let skip = session.messages.len().saturating_sub(PROMPT_HISTORY);
        for message in &session.messages[skip..] {
            let who = match message.speaker {
                Speaker::Patient => "Patient",
                Speaker::Assistant => "Assistant",
            };
            prompt.push_str(&format!("{who}: {}\n", message.text));
        }
        prompt.push_str(&format!("Patient: {text}\n\n"));
        prompt.push_str(&format!("Detected intent: {intent}\n"));
        let symptoms = symptom_names(assessment);
        if !symptoms.is_empty() {
            prompt.push_str(&format!("Symptoms so far: {}\n", symptoms.join(", ")));
        }
        prompt.push_str(&format!("Urgency: {}\n", assessment.urgency.level));
        match question {
            Some(q) => prompt.push_str(&format!("End your reply by asking exactly this question: {q}\n")),
            None => prompt.push_str("Do not ask any further questions.\n"),
        }

        let request = LlmRequest::new(REPLY_SYSTEM, prompt)
            .with_temperature(0.6)
            .with_max_tokens(250);
        match self.ai.generate(&request).await {
            Ok(response) => {
                let mut reply = response.text.trim().to_string();
                if reply.is_empty() {
                    return None;
                }
                if let Some(q) = question {
                    if !reply.contains(q) {
                        reply.push(' ');
                        reply.push_str(q);
                    }
                }
                Some(reply)
            }
            Err(e) => {
                warn!("Falling back to canned reply: {}", e);
                None
            }
        }
    }

    pub async fn summary(&self, id: Uuid) -> Result<ConversationSummary, ConversationError> {
        let session = self.store.get(id).await.ok_or(ConversationError::NotFound(id))?;
        Ok(summarize(session))
    }

    /// Builds a SOAP note from the conversation so far. The first note of a
    /// session is also counted in population analytics.
    #[instrument(skip(self), fields(session_id = %id))]
    pub async fn generate_soap(&self, id: Uuid, enhance: bool) -> Result<SoapNote, ConversationError> {
        let session = self.store.get(id).await.ok_or(ConversationError::NotFound(id))?;
        let input = SoapInput {
            patient: session.patient.clone(),
            transcript: session.transcript(),
            vitals: None,
            assessment: session.assessment.clone(),
        };
        let mut note = self.soap.generate(&input)?;
        if enhance {
            note = self.soap.enhance_with_ai(note).await;
        }

        let first = self
            .store
            .update(id, |s| !std::mem::replace(&mut s.analytics_recorded, true))
            .await
            .unwrap_or(false);
        if first {
            if let Some(assessment) = &session.assessment {
                self.analytics
                    .record(Observation::new(
                        session.patient.age,
                        session.patient.sex.as_deref(),
                        assessment.active_symptoms().map(|m| m.category).collect(),
                        assessment.urgency.level,
                    ))
                    .await;
            }
        }
        Ok(note)
    }

    pub async fn end(&self, id: Uuid) -> Result<ConversationSummary, ConversationError> {
        let session = self.store.remove(id).await.ok_or(ConversationError::NotFound(id))?;
        self.predictive.forget(&id.to_string()).await;
        info!(session_id = %id, messages = session.messages.len(), "Conversation ended");
        Ok(summarize(session))
    }

    /// Drops idle sessions along with their intent histories.
    pub async fn purge_idle(&self) -> usize {
        self.purge_idle_at(Utc::now()).await
    }

    pub async fn purge_idle_at(&self, now: DateTime<Utc>) -> usize {
        let purged = self.store.purge_idle_at(now).await;
        for id in &purged {
            self.predictive.forget(&id.to_string()).await;
        }
        purged.len()
    }
}

fn summarize(session: ConversationSession) -> ConversationSummary {
    let (symptoms, possible_conditions) = match &session.assessment {
        Some(a) => (symptom_names(a), a.possible_conditions.clone()),
        None => (Vec::new(), Vec::new()),
    };
    ConversationSummary {
        session_id: session.id,
        message_count: session.messages.len(),
        intents: session.messages.iter().filter_map(|m| m.intent).collect(),
        symptoms,
        urgency: session.urgency(),
        possible_conditions,
        started_at: session.started_at,
        last_active: session.last_active,
        messages: session.messages,
    }
}

fn symptom_names(assessment: &SymptomAssessment) -> Vec<String> {
    assessment
        .active_symptoms()
        .map(|m| m.category.display_name().to_string())
        .collect()
}

/// Closing remarks get no question back.
fn next_question(intent: Intent, assessment: &SymptomAssessment) -> Option<String> {
    match intent {
        Intent::Gratitude | Intent::Goodbye => None,
        _ => assessment.follow_up_questions.first().cloned(),
    }
}

fn canned_reply(intent: Intent, assessment: &SymptomAssessment, question: Option<&str>) -> String {
    let level = assessment.urgency.level;
    let opening = match intent {
        Intent::Greeting => "Hello, I'm here to help.".to_string(),
        Intent::MedicationInquiry => "I can't give personal medication advice, so please check doses \
and interactions with a pharmacist or your doctor."
            .to_string(),
        Intent::AppointmentRequest => "I can't book appointments, but I can prepare a summary of our \
conversation that you can share with a clinician."
            .to_string(),
        Intent::Gratitude => "You're welcome. I hope you feel better soon.".to_string(),
        Intent::Goodbye => "Take care. Come back any time if anything changes or gets worse.".to_string(),
        Intent::ClarificationRequest => "Sorry, let me put that more simply.".to_string(),
        _ if assessment.active_symptoms().next().is_some() => {
            format!("Thank you for telling me about your {}.", symptom_names(assessment).join(" and "))
        }
        _ => "Thank you, I understand.".to_string(),
    };

    let mut reply = opening;
    if level >= UrgencyLevel::Moderate {
        reply.push(' ');
        reply.push_str(level.care_advice());
    }
    if let Some(q) = question {
        reply.push(' ');
        reply.push_str(q);
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use shared_utils::test_utils::TestConfig;

    fn service() -> ChatService {
        let config = TestConfig::default().to_app_config();
        ChatService::new(
            Arc::new(SessionStore::new(4, Duration::minutes(60))),
            Arc::new(IntentPredictionModel::new()),
            Arc::new(PredictiveIntentEngine::new()),
            Arc::new(AiServiceManager::new(&config)),
            Arc::new(PopulationAnalytics::new(2).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_start_greets_and_stores_session() {
        let chat = service();
        let session = chat.start(PatientContext::default()).await;
        assert_eq!(session.messages.len(), 1);
        assert_eq!(chat.store().len().await, 1);
        assert!(session.last_bot_asked_question());
    }

    #[tokio::test]
    async fn test_symptom_message_gets_canned_reply_with_question() {
        let chat = service();
        let id = chat.start(PatientContext::default()).await.id;

        let reply = chat.handle_message(id, "I have had a headache for 2 days").await.unwrap();
        assert_eq!(reply.source, ReplySource::Canned);
        assert!(reply.reply.contains("headache"));

        let session = chat.store().get(id).await.unwrap();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.asked_questions.len(), 1);
        assert!(reply.reply.ends_with(session.asked_questions[0].as_str()));
        assert!(!reply.follow_up_questions.contains(&session.asked_questions[0]));
    }

    #[tokio::test]
    async fn test_questions_are_not_repeated() {
        let chat = service();
        let id = chat.start(PatientContext::default()).await.id;

        chat.handle_message(id, "I have a sore throat").await.unwrap();
        chat.handle_message(id, "it is worse when I swallow").await.unwrap();
        let session = chat.store().get(id).await.unwrap();
        assert_eq!(session.asked_questions.len(), 2);
        assert_ne!(session.asked_questions[0], session.asked_questions[1]);
    }

    #[tokio::test]
    async fn test_emergency_skips_the_model() {
        let chat = service();
        let id = chat.start(PatientContext::default()).await.id;

        let reply = chat
            .handle_message(id, "crushing chest pain and I cant breathe")
            .await
            .unwrap();
        assert_eq!(reply.source, ReplySource::Emergency);
        assert_eq!(reply.urgency, UrgencyLevel::Emergency);
        assert_eq!(reply.reply, EMERGENCY_REPLY);
    }

    #[tokio::test]
    async fn test_symptoms_accumulate_across_turns() {
        let chat = service();
        let id = chat.start(PatientContext::default()).await.id;

        chat.handle_message(id, "I have a fever").await.unwrap();
        chat.handle_message(id, "and now a cough too").await.unwrap();
        let summary = chat.summary(id).await.unwrap();
        assert!(summary.symptoms.contains(&"fever".to_string()));
        assert!(summary.symptoms.contains(&"cough".to_string()));
        assert_eq!(summary.intents.len(), 2);
    }

    #[tokio::test]
    async fn test_message_validation() {
        let chat = service();
        let id = chat.start(PatientContext::default()).await.id;

        assert_matches!(chat.handle_message(id, "   ").await, Err(ConversationError::EmptyMessage));
        assert_matches!(
            chat.handle_message(id, &"a".repeat(MAX_MESSAGE_CHARS + 1)).await,
            Err(ConversationError::MessageTooLong(..))
        );
        assert_matches!(
            chat.handle_message(Uuid::new_v4(), "hello").await,
            Err(ConversationError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn test_soap_records_population_observation_once() {
        let chat = service();
        let id = chat.start(PatientContext { age: Some(30), ..Default::default() }).await.id;
        chat.handle_message(id, "I have a fever and a cough").await.unwrap();

        let note = chat.generate_soap(id, false).await.unwrap();
        assert!(!note.assessment.symptoms.is_empty());
        chat.generate_soap(id, false).await.unwrap();
        assert_eq!(chat.analytics.len().await, 1);
    }

    #[tokio::test]
    async fn test_end_removes_session() {
        let chat = service();
        let id = chat.start(PatientContext::default()).await.id;
        chat.handle_message(id, "I feel dizzy").await.unwrap();

        let summary = chat.end(id).await.unwrap();
        assert_eq!(summary.message_count, 3);
        assert!(chat.store().get(id).await.is_none());
        assert!(chat.predictive.history(&id.to_string()).await.is_empty());
        assert_matches!(chat.end(id).await, Err(ConversationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_red_flag_affirmed_in_later_turn_raises_urgency() {
        let chat = service();
        let id = chat.start(PatientContext::default()).await.id;
        chat.handle_message(id, "I have a headache and a fever but no stiff neck").await.unwrap();

        let reply = chat.handle_message(id, "I have a stiff neck now").await.unwrap();
        assert!(reply.urgency >= UrgencyLevel::Urgent);
        let session = chat.store().get(id).await.unwrap();
        let assessment = session.assessment.unwrap();
        assert!(assessment.red_flags.iter().any(|f| f.phrase == "stiff neck"));
    }

    #[tokio::test]
    async fn test_purging_idle_session_forgets_intent_history() {
        let chat = service();
        let id = chat.start(PatientContext::default()).await.id;
        chat.handle_message(id, "I have a headache").await.unwrap();
        assert!(!chat.predictive.history(&id.to_string()).await.is_empty());

        assert_eq!(chat.purge_idle_at(Utc::now() + Duration::minutes(61)).await, 1);
        assert!(chat.store().get(id).await.is_none());
        assert!(chat.predictive.history(&id.to_string()).await.is_empty());
        assert_eq!(chat.predictive.session_count().await, 0);
    }
}
