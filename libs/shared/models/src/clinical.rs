use std::fmt;

use serde::{Deserialize, Serialize};

/// Triage level attached to assessments, conversations and SOAP notes.
///
/// Ordered from least to most severe so `max()` picks the worst level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Routine,
    Moderate,
    Urgent,
    Critical,
    Emergency,
}

impl UrgencyLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            UrgencyLevel::Emergency
        } else if score >= 0.65 {
            UrgencyLevel::Critical
        } else if score >= 0.45 {
            UrgencyLevel::Urgent
        } else if score >= 0.25 {
            UrgencyLevel::Moderate
        } else {
            UrgencyLevel::Routine
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Routine => "routine",
            UrgencyLevel::Moderate => "moderate",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Critical => "critical",
            UrgencyLevel::Emergency => "emergency",
        }
    }

    pub fn care_advice(&self) -> &'static str {
        match self {
            UrgencyLevel::Routine => {
                "Self-care at home is usually appropriate. Book a routine visit if symptoms persist beyond a week."
            }
            UrgencyLevel::Moderate => {
                "Arrange to see a healthcare provider within the next few days."
            }
            UrgencyLevel::Urgent => {
                "Please see a healthcare provider within 24 hours, or visit urgent care."
            }
            UrgencyLevel::Critical => {
                "Seek medical care today at an urgent care centre or emergency department."
            }
            UrgencyLevel::Emergency => {
                "Call emergency services or go to the nearest emergency department immediately."
            }
        }
    }

    /// Hours within which a follow-up contact should happen.
    pub fn follow_up_hours(&self) -> u32 {
        match self {
            UrgencyLevel::Routine => 168,
            UrgencyLevel::Moderate => 72,
            UrgencyLevel::Urgent => 24,
            UrgencyLevel::Critical => 4,
            UrgencyLevel::Emergency => 0,
        }
    }

    pub fn requires_immediate_care(&self) -> bool {
        *self >= UrgencyLevel::Critical
    }
}

impl Default for UrgencyLevel {
    fn default() -> Self {
        UrgencyLevel::Routine
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Mild => 0.3,
            Severity::Moderate => 0.6,
            Severity::Severe => 1.0,
        }
    }

    /// Maps a 0-10 pain rating onto a severity band.
    pub fn from_pain_scale(rating: u8) -> Self {
        match rating {
            0..=3 => Severity::Mild,
            4..=6 => Severity::Moderate,
            _ => Severity::Severe,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Moderate
    }
}

/// Patient context shared by assessment, conversation and note generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientContext {
    pub age: Option<u32>,
    pub sex: Option<String>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_thresholds() {
        assert_eq!(UrgencyLevel::from_score(0.0), UrgencyLevel::Routine);
        assert_eq!(UrgencyLevel::from_score(0.25), UrgencyLevel::Moderate);
        assert_eq!(UrgencyLevel::from_score(0.5), UrgencyLevel::Urgent);
        assert_eq!(UrgencyLevel::from_score(0.7), UrgencyLevel::Critical);
        assert_eq!(UrgencyLevel::from_score(0.99), UrgencyLevel::Emergency);
    }

    #[test]
    fn test_urgency_ordering_picks_worst() {
        let worst = [UrgencyLevel::Moderate, UrgencyLevel::Critical, UrgencyLevel::Routine]
            .into_iter()
            .max();
        assert_eq!(worst, Some(UrgencyLevel::Critical));
        assert!(UrgencyLevel::Emergency.requires_immediate_care());
        assert!(!UrgencyLevel::Urgent.requires_immediate_care());
    }

    #[test]
    fn test_urgency_serializes_snake_case() {
        let json = serde_json::to_string(&UrgencyLevel::Emergency).unwrap();
        assert_eq!(json, "\"emergency\"");
    }

    #[test]
    fn test_pain_scale_bands() {
        assert_eq!(Severity::from_pain_scale(2), Severity::Mild);
        assert_eq!(Severity::from_pain_scale(5), Severity::Moderate);
        assert_eq!(Severity::from_pain_scale(9), Severity::Severe);
    }
}
