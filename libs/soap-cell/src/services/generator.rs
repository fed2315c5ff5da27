use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use ai_gateway_cell::{AiServiceManager, LlmRequest};
use shared_models::clinical::PatientContext;
use shared_utils::text::{tail_chars, truncate_chars};
use symptom_cell::models::{ReliefKind, SymptomAssessment, SymptomMention};
use symptom_cell::services::engine::MAX_DESCRIPTION_CHARS;
use symptom_cell::services::{action_plan, recommend_relief};
use symptom_cell::SymptomAssessmentEngine;

use super::vitals::scrape_vitals;
use crate::models::{
    Assessment, Objective, Plan, ReportedVitals, SoapError, SoapInput, SoapNote, Speaker, Subjective,
    TranscriptTurn,
};

const MAX_CHIEF_COMPLAINT_CHARS: usize = 200;

pub const NO_OBJECTIVE_DATA: &str = "No objective data collected: this note is based on a remote \
conversation and no examination or measurements were performed.";

pub const DISCLAIMER: &str = "Generated from a patient conversation with an automated assistant. \
It is not a diagnosis and must be reviewed by a licensed clinician.";

const SUMMARY_SYSTEM: &str = "You are a clinical documentation assistant. Write concise, \
factual summaries for clinicians. Do not invent findings.";

/// Builds SOAP notes from a conversation transcript.
#[derive(Clone, Default)]
pub struct SoapGenerator {
    engine: SymptomAssessmentEngine,
    ai: Option<Arc<AiServiceManager>>,
}

impl SoapGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ai(ai: Arc<AiServiceManager>) -> Self {
        Self { engine: SymptomAssessmentEngine::new(), ai: Some(ai) }
    }

    #[instrument(skip_all, fields(turns = input.transcript.len()))]
    pub fn generate(&self, input: &SoapInput) -> Result<SoapNote, SoapError> {
        let patient_text = patient_text(&input.transcript);
        if patient_text.trim().is_empty() {
            return Err(SoapError::EmptyTranscript);
        }

        let assessment = match &input.assessment {
            Some(existing) => existing.clone(),
            None => self
                .engine
                .assess_with_asked(recent(&patient_text), &input.patient, &[])?,
        };

        let note = SoapNote {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            subjective: subjective(&input.transcript, &input.patient, &assessment),
            objective: objective(input.vitals.clone(), &patient_text),
            assessment: assessment_section(&assessment),
            plan: plan(&assessment),
        };
        debug!(note_id = %note.id, urgency = %note.assessment.urgency, "SOAP note generated");
        Ok(note)
    }

    /// Appends a model-written clinical summary to the assessment. The note
    /// is returned unchanged if no model is reachable.
    #[instrument(skip_all, fields(note_id = %note.id))]
    pub async fn enhance_with_ai(&self, mut note: SoapNote) -> SoapNote {
        let Some(ai) = &self.ai else {
            return note;
        };
        let prompt = format!(
            "Summarise the following SOAP note for a clinician in at most three sentences. \
             Mention the most likely considerations and the urgency.\n\n{}",
            note.to_text()
        );
        let request = LlmRequest::new(SUMMARY_SYSTEM, prompt)
            .with_temperature(0.2)
            .with_max_tokens(300);

        match ai.generate(&request).await {
            Ok(response) => {
                let summary = response.text.trim();
                if !summary.is_empty() {
                    note.assessment.ai_summary = Some(summary.to_string());
                }
            }
            Err(e) => warn!("SOAP enhancement skipped: {}", e),
        }
        note
    }
}

fn patient_text(transcript: &[TranscriptTurn]) -> String {
    transcript
        .iter()
        .filter(|t| t.speaker == Speaker::Patient)
        .map(|t| t.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(". ")
}

/// Long conversations are assessed on their most recent part.
fn recent(text: &str) -> &str {
    tail_chars(text, MAX_DESCRIPTION_CHARS)
}

fn chief_complaint(transcript: &[TranscriptTurn]) -> String {
    let patient_turns = || {
        transcript
            .iter()
            .filter(|t| t.speaker == Speaker::Patient && !t.text.trim().is_empty())
    };
    let with_symptoms = patient_turns().find(|t| {
        symptom_cell::services::extract_symptoms(&t.text)
            .iter()
            .any(|m| !m.negated)
    });
    with_symptoms
        .or_else(|| patient_turns().next())
        .map(|t| truncate_chars(t.text.trim(), MAX_CHIEF_COMPLAINT_CHARS).to_string())
        .unwrap_or_default()
}

fn describe_mention(mention: &SymptomMention) -> String {
    let mut parts = vec![capitalize(mention.category.display_name())];
    let severity = format!("{:?}", mention.severity).to_lowercase();
    parts.push(match mention.pain_scale {
        Some(rating) => format!("{severity} ({rating}/10)"),
        None if mention.severity_stated => severity,
        None => "severity not stated".to_string(),
    });
    if let Some(location) = &mention.location {
        parts.push(format!("located at {location}"));
    }
    parts.push(match &mention.duration {
        Some(duration) => format!("onset {}", duration.text),
        None => "onset not stated".to_string(),
    });
    parts.join(", ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn subjective(
    transcript: &[TranscriptTurn],
    patient: &PatientContext,
    assessment: &SymptomAssessment,
) -> Subjective {
    let mut hpi: Vec<String> = assessment.active_symptoms().map(describe_mention).collect();
    let denied: Vec<&str> = assessment
        .symptoms
        .iter()
        .filter(|m| m.negated)
        .map(|m| m.category.display_name())
        .collect();
    if !denied.is_empty() {
        hpi.push(format!("Denies {}", denied.join(", ")));
    }
    let history_of_present_illness = if hpi.is_empty() {
        "Patient did not describe specific symptoms.".to_string()
    } else {
        format!("{}.", hpi.join(". "))
    };

    let mut reported_history = Vec::new();
    if let Some(age) = patient.age {
        reported_history.push(format!("Age {age}"));
    }
    if let Some(sex) = &patient.sex {
        reported_history.push(format!("Sex {sex}"));
    }
    reported_history.extend(patient.chronic_conditions.iter().map(|c| format!("Known condition: {c}")));

    Subjective {
        chief_complaint: chief_complaint(transcript),
        history_of_present_illness,
        reported_history,
        medications: patient.medications.clone(),
        allergies: patient.allergies.clone(),
    }
}

fn objective(vitals: Option<ReportedVitals>, patient_text: &str) -> Objective {
    let vitals = vitals
        .filter(|v| !v.is_empty())
        .or_else(|| Some(scrape_vitals(patient_text)).filter(|v| !v.is_empty()));
    let observations = match vitals {
        Some(_) => vec!["Vitals are patient-reported and were not verified.".to_string()],
        None => vec![NO_OBJECTIVE_DATA.to_string()],
    };
    Objective { vitals, observations }
}

fn assessment_section(assessment: &SymptomAssessment) -> Assessment {
    Assessment {
        symptoms: assessment.active_symptoms().map(describe_mention).collect(),
        patterns: assessment
            .relationships
            .iter()
            .map(|r| format!("{} (strength {:.2})", r.description, r.strength))
            .collect(),
        differential: assessment.possible_conditions.clone(),
        red_flags: assessment.red_flags.iter().map(|f| f.phrase.clone()).collect(),
        urgency: assessment.urgency.level,
        urgency_score: assessment.urgency.score,
        ai_summary: None,
    }
}

fn plan(assessment: &SymptomAssessment) -> Plan {
    let level = assessment.urgency.level;
    let relief = recommend_relief(assessment);
    let action = action_plan(assessment);

    let mut recommendations = vec![level.care_advice().to_string()];
    if relief.iter().any(|r| r.kind == ReliefKind::SelfCare) {
        recommendations.push("Self-care measures as listed below while symptoms are monitored".to_string());
    }

    let follow_up = match level.follow_up_hours() {
        0 => "Immediate in-person evaluation".to_string(),
        hours if hours < 24 => format!("Within {hours} hours"),
        hours => format!("Within {} days if not improving", hours / 24),
    };

    Plan {
        recommendations,
        relief: relief
            .into_iter()
            .filter(|r| r.kind == ReliefKind::SelfCare)
            .flat_map(|r| r.measures)
            .collect(),
        follow_up,
        return_precautions: action.warning_signs,
        disclaimer: DISCLAIMER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::clinical::UrgencyLevel;

    fn transcript() -> Vec<TranscriptTurn> {
        vec![
            TranscriptTurn::assistant("Hello, how can I help?"),
            TranscriptTurn::patient("Hi"),
            TranscriptTurn::patient("I've had a headache on my forehead for 2 days, about 6/10"),
            TranscriptTurn::assistant("Do you have a fever?"),
            TranscriptTurn::patient("No fever, but I feel tired"),
        ]
    }

    #[test]
    fn test_note_sections() {
        let input = SoapInput {
            patient: PatientContext {
                age: Some(45),
                medications: vec!["lisinopril".into()],
                ..Default::default()
            },
            transcript: transcript(),
            ..Default::default()
        };
        let note = SoapGenerator::new().generate(&input).unwrap();

        assert!(note.subjective.chief_complaint.starts_with("I've had a headache"));
        assert!(note
            .subjective
            .history_of_present_illness
            .contains("Headache, moderate (6/10), located at forehead, onset for 2 days"));
        assert!(note.subjective.history_of_present_illness.contains("Denies fever"));
        assert_eq!(note.subjective.medications, vec!["lisinopril"]);
        assert_eq!(note.objective.observations, vec![NO_OBJECTIVE_DATA]);
        assert_eq!(note.assessment.urgency, UrgencyLevel::Routine);
        assert!(!note.plan.relief.is_empty());
    }

    #[test]
    fn test_reported_vitals_fill_objective() {
        let input = SoapInput {
            transcript: vec![TranscriptTurn::patient("fever and my temperature is 39.2")],
            ..Default::default()
        };
        let note = SoapGenerator::new().generate(&input).unwrap();
        assert_eq!(note.objective.vitals.and_then(|v| v.temperature_c), Some(39.2));
    }

    #[test]
    fn test_text_has_four_sections() {
        let input = SoapInput { transcript: transcript(), ..Default::default() };
        let text = SoapGenerator::new().generate(&input).unwrap().to_text();
        let positions: Vec<usize> = ["SUBJECTIVE", "OBJECTIVE", "ASSESSMENT", "PLAN"]
            .iter()
            .map(|h| text.find(h).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn test_transcript_without_patient_is_rejected() {
        let input = SoapInput {
            transcript: vec![TranscriptTurn::assistant("Hello")],
            ..Default::default()
        };
        assert_matches!(SoapGenerator::new().generate(&input), Err(SoapError::EmptyTranscript));
    }

    #[test]
    fn test_long_transcript_is_assessed_on_recent_text() {
        let mut transcript = vec![TranscriptTurn::patient("x".repeat(MAX_DESCRIPTION_CHARS))];
        transcript.push(TranscriptTurn::patient("now I have a cough"));
        let input = SoapInput { transcript, ..Default::default() };
        let note = SoapGenerator::new().generate(&input).unwrap();
        assert_eq!(note.assessment.symptoms.len(), 1);
    }

    #[tokio::test]
    async fn test_enhance_without_ai_returns_note_unchanged() {
        let input = SoapInput { transcript: transcript(), ..Default::default() };
        let generator = SoapGenerator::new();
        let note = generator.generate(&input).unwrap();
        let enhanced = generator.enhance_with_ai(note.clone()).await;
        assert_eq!(enhanced.id, note.id);
        assert!(enhanced.assessment.ai_summary.is_none());
    }
}
