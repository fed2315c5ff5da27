use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use shared_models::clinical::UrgencyLevel;
use symptom_cell::SymptomCategory;

use crate::models::{
    AgeBand, AnalyticsError, CoOccurrence, GroupInsight, Observation, PopulationInsights, Sex,
    SexInsight,
};

/// Aggregates anonymised observations and only reports groups that contain
/// at least `k` observations.
#[derive(Debug)]
pub struct PopulationAnalytics {
    k: usize,
    observations: RwLock<Vec<Observation>>,
}

impl PopulationAnalytics {
    pub fn new(k: usize) -> Result<Self, AnalyticsError> {
        if k < 2 {
            return Err(AnalyticsError::InvalidThreshold(k));
        }
        Ok(Self { k, observations: RwLock::new(Vec::new()) })
    }

    pub fn k_threshold(&self) -> usize {
        self.k
    }

    #[instrument(skip_all, fields(age_band = ?observation.age_band))]
    pub async fn record(&self, observation: Observation) {
        if observation.categories.is_empty() {
            debug!("Observation without symptom categories ignored");
            return;
        }
        self.observations.write().await.push(observation);
    }

    pub async fn len(&self) -> usize {
        self.observations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn population_insights(&self) -> PopulationInsights {
        let observations = self.observations.read().await;

        let mut groups: BTreeMap<(AgeBand, SymptomCategory), BTreeMap<UrgencyLevel, usize>> = BTreeMap::new();
        let mut by_sex: BTreeMap<(Sex, SymptomCategory), usize> = BTreeMap::new();
        let mut pairs: HashMap<(SymptomCategory, SymptomCategory), usize> = HashMap::new();
        for obs in observations.iter() {
            for category in &obs.categories {
                *groups
                    .entry((obs.age_band, *category))
                    .or_default()
                    .entry(obs.urgency)
                    .or_insert(0) += 1;
                *by_sex.entry((obs.sex, *category)).or_insert(0) += 1;
            }
            // categories are sorted and deduplicated on construction
            for (i, a) in obs.categories.iter().enumerate() {
                for b in &obs.categories[i + 1..] {
                    *pairs.entry((*a, *b)).or_insert(0) += 1;
                }
            }
        }

        let mut reported = Vec::new();
        let mut suppressed_groups = 0;
        for ((age_band, category), urgency_distribution) in groups {
            let count: usize = urgency_distribution.values().sum();
            if count >= self.k {
                reported.push(GroupInsight { age_band, category, count, urgency_distribution });
            } else {
                suppressed_groups += 1;
            }
        }

        let (sex_kept, sex_dropped): (Vec<_>, Vec<_>) = by_sex.into_iter().partition(|(_, count)| *count >= self.k);
        let sex_groups: Vec<SexInsight> = sex_kept
            .into_iter()
            .map(|((sex, category), count)| SexInsight { sex, category, count })
            .collect();

        let (kept, dropped): (Vec<_>, Vec<_>) = pairs.into_iter().partition(|(_, count)| *count >= self.k);
        let mut co_occurrences: Vec<CoOccurrence> = kept
            .into_iter()
            .map(|((a, b), count)| CoOccurrence { categories: [a, b], count })
            .collect();
        co_occurrences.sort_by(|x, y| y.count.cmp(&x.count).then(x.categories.cmp(&y.categories)));

        debug!(
            reported = reported.len(),
            suppressed = suppressed_groups,
            "Population insights computed"
        );

        PopulationInsights {
            k_threshold: self.k,
            total_observations: observations.len(),
            groups: reported,
            suppressed_groups,
            sex_groups,
            suppressed_sex_groups: sex_dropped.len(),
            co_occurrences,
            suppressed_co_occurrences: dropped.len(),
        }
    }
}
