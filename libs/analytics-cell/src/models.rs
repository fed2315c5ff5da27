use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use shared_models::clinical::UrgencyLevel;
use symptom_cell::SymptomCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "0-17")]
    Minor,
    #[serde(rename = "18-39")]
    YoungAdult,
    #[serde(rename = "40-64")]
    MiddleAged,
    #[serde(rename = "65+")]
    Senior,
    #[serde(rename = "unknown")]
    Unknown,
}

impl AgeBand {
    pub fn from_age(age: Option<u32>) -> Self {
        match age {
            Some(0..=17) => AgeBand::Minor,
            Some(18..=39) => AgeBand::YoungAdult,
            Some(40..=64) => AgeBand::MiddleAged,
            Some(_) => AgeBand::Senior,
            None => AgeBand::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
    Other,
    Unknown,
}

impl Sex {
    /// Collapses free-text values to the fixed vocabulary.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Sex::Unknown;
        };
        match raw.trim().to_lowercase().as_str() {
            "f" | "female" | "woman" => Sex::Female,
            "m" | "male" | "man" => Sex::Male,
            "" => Sex::Unknown,
            _ => Sex::Other,
        }
    }
}

/// One anonymised consultation outcome. Carries no identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub age_band: AgeBand,
    pub sex: Sex,
    pub categories: Vec<SymptomCategory>,
    pub urgency: UrgencyLevel,
}

impl Observation {
    pub fn new(
        age: Option<u32>,
        sex: Option<&str>,
        categories: Vec<SymptomCategory>,
        urgency: UrgencyLevel,
    ) -> Self {
        let mut categories = categories;
        categories.sort();
        categories.dedup();
        Self {
            age_band: AgeBand::from_age(age),
            sex: Sex::parse(sex),
            categories,
            urgency,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupInsight {
    pub age_band: AgeBand,
    pub category: SymptomCategory,
    pub count: usize,
    pub urgency_distribution: BTreeMap<UrgencyLevel, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SexInsight {
    pub sex: Sex,
    pub category: SymptomCategory,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoOccurrence {
    pub categories: [SymptomCategory; 2],
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopulationInsights {
    pub k_threshold: usize,
    pub total_observations: usize,
    pub groups: Vec<GroupInsight>,
    pub suppressed_groups: usize,
    pub sex_groups: Vec<SexInsight>,
    pub suppressed_sex_groups: usize,
    pub co_occurrences: Vec<CoOccurrence>,
    pub suppressed_co_occurrences: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("k-anonymity threshold must be at least 2, got {0}")]
    InvalidThreshold(usize),
}

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        let status = match self {
            AnalyticsError::InvalidThreshold(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bands() {
        assert_eq!(AgeBand::from_age(Some(17)), AgeBand::Minor);
        assert_eq!(AgeBand::from_age(Some(18)), AgeBand::YoungAdult);
        assert_eq!(AgeBand::from_age(Some(64)), AgeBand::MiddleAged);
        assert_eq!(AgeBand::from_age(Some(65)), AgeBand::Senior);
        assert_eq!(AgeBand::from_age(None), AgeBand::Unknown);
        assert_eq!(serde_json::to_string(&AgeBand::Senior).unwrap(), "\"65+\"");
    }

    #[test]
    fn test_observation_normalises_inputs() {
        let obs = Observation::new(
            Some(30),
            Some(" Female "),
            vec![SymptomCategory::Fever, SymptomCategory::Cough, SymptomCategory::Fever],
            UrgencyLevel::Moderate,
        );
        assert_eq!(obs.sex, Sex::Female);
        assert_eq!(Sex::parse(Some("M")), Sex::Male);
        assert_eq!(Sex::parse(Some("nonbinary")), Sex::Other);
        assert_eq!(Sex::parse(None), Sex::Unknown);
        assert_eq!(obs.categories, vec![SymptomCategory::Fever, SymptomCategory::Cough]);
    }
}
