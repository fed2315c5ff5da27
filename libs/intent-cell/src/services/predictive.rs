use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use super::ensemble::ranked;
use super::normalized;
use crate::models::{Distribution, Intent, IntentScore};

/// Intents kept per session; the oldest entries are dropped past this.
const MAX_HISTORY: usize = 50;

/// Sessions tracked at once unless configured otherwise.
const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Typical next intent when no transitions have been observed yet.
pub(crate) fn successor_prior(current: Intent) -> Distribution {
    use Intent::*;
    let weighted: &[(Intent, f64)] = match current {
        Greeting => &[(SymptomDescription, 0.5), (GeneralHealthQuestion, 0.2), (MedicationInquiry, 0.15), (AppointmentRequest, 0.15)],
        SymptomDescription => &[(FollowUpAnswer, 0.5), (SymptomDescription, 0.25), (MedicationInquiry, 0.1), (AppointmentRequest, 0.1), (Emergency, 0.05)],
        MedicationInquiry => &[(FollowUpAnswer, 0.3), (MedicationInquiry, 0.3), (Gratitude, 0.2), (SymptomDescription, 0.2)],
        AppointmentRequest => &[(FollowUpAnswer, 0.5), (Gratitude, 0.3), (Goodbye, 0.2)],
        Emergency => &[(FollowUpAnswer, 0.5), (Emergency, 0.3), (Gratitude, 0.2)],
        FollowUpAnswer => &[(FollowUpAnswer, 0.45), (SymptomDescription, 0.2), (Gratitude, 0.15), (ClarificationRequest, 0.1), (AppointmentRequest, 0.1)],
        GeneralHealthQuestion => &[(GeneralHealthQuestion, 0.4), (Gratitude, 0.3), (SymptomDescription, 0.2), (Goodbye, 0.1)],
        Gratitude => &[(Goodbye, 0.6), (GeneralHealthQuestion, 0.2), (SymptomDescription, 0.2)],
        Goodbye => &[(Greeting, 1.0)],
        ClarificationRequest => &[(FollowUpAnswer, 0.6), (SymptomDescription, 0.2), (ClarificationRequest, 0.2)],
    };
    let mut dist = [0.0; Intent::COUNT];
    for (intent, p) in weighted {
        dist[intent.index()] = *p;
    }
    normalized(dist)
}

#[derive(Default)]
struct SessionTrail {
    intents: Vec<Intent>,
    last_seen: u64,
}

#[derive(Default)]
struct EngineState {
    histories: HashMap<String, SessionTrail>,
    transitions: [[u32; Intent::COUNT]; Intent::COUNT],
    clock: u64,
}

impl EngineState {
    fn evict_least_recent(&mut self) {
        let oldest = self
            .histories
            .iter()
            .min_by_key(|(_, trail)| trail.last_seen)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            self.histories.remove(&id);
            debug!(session_id = %id, "Dropped least recently observed intent history");
        }
    }
}

/// First-order model of which intent tends to follow which.
pub struct PredictiveIntentEngine {
    max_sessions: usize,
    state: RwLock<EngineState>,
}

impl Default for PredictiveIntentEngine {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl PredictiveIntentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that keeps at most `max_sessions` histories, dropping the least
    /// recently observed one to make room. Transition counts are unaffected.
    pub fn with_capacity(max_sessions: usize) -> Self {
        Self {
            max_sessions: max_sessions.max(1),
            state: RwLock::new(EngineState::default()),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.state.read().await.histories.len()
    }

    /// Appends `intent` to the session's sequence and counts the transition.
    pub async fn observe(&self, session_id: &str, intent: Intent) {
        let mut state = self.state.write().await;
        let previous = state
            .histories
            .get(session_id)
            .and_then(|t| t.intents.last().copied());
        if let Some(prev) = previous {
            state.transitions[prev.index()][intent.index()] += 1;
        }
        if !state.histories.contains_key(session_id) && state.histories.len() >= self.max_sessions {
            state.evict_least_recent();
        }
        state.clock += 1;
        let now = state.clock;
        let trail = state.histories.entry(session_id.to_string()).or_default();
        trail.last_seen = now;
        trail.intents.push(intent);
        if trail.intents.len() > MAX_HISTORY {
            trail.intents.remove(0);
        }
        debug!(?previous, %intent, "Intent transition recorded");
    }

    pub async fn history(&self, session_id: &str) -> Vec<Intent> {
        self.state
            .read()
            .await
            .histories
            .get(session_id)
            .map(|t| t.intents.clone())
            .unwrap_or_default()
    }

    pub async fn last_intent(&self, session_id: &str) -> Option<Intent> {
        self.state
            .read()
            .await
            .histories
            .get(session_id)
            .and_then(|t| t.intents.last().copied())
    }

    pub async fn forget(&self, session_id: &str) {
        self.state.write().await.histories.remove(session_id);
    }

    /// Ranked next-intent distribution from observed transitions, or the
    /// static prior when `current` has never been followed by anything.
    pub async fn predict_next(&self, current: Intent) -> Vec<IntentScore> {
        let state = self.state.read().await;
        let row = &state.transitions[current.index()];
        let total: u32 = row.iter().sum();
        if total == 0 {
            return ranked(&successor_prior(current));
        }
        let mut dist = [0.0; Intent::COUNT];
        for (p, count) in dist.iter_mut().zip(row.iter()) {
            *p = f64::from(*count) / f64::from(total);
        }
        ranked(&dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uses_static_prior_without_observations() {
        let engine = PredictiveIntentEngine::new();
        let next = engine.predict_next(Intent::Greeting).await;
        assert_eq!(next[0].intent, Intent::SymptomDescription);
        assert!((next.iter().map(|s| s.probability).sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_observed_transitions_override_prior() {
        let engine = PredictiveIntentEngine::new();
        for session in ["a", "b"] {
            engine.observe(session, Intent::Greeting).await;
            engine.observe(session, Intent::AppointmentRequest).await;
        }
        let next = engine.predict_next(Intent::Greeting).await;
        assert_eq!(next[0].intent, Intent::AppointmentRequest);
        assert_eq!(next[0].probability, 1.0);
        assert_eq!(engine.history("a").await, vec![Intent::Greeting, Intent::AppointmentRequest]);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_sequences() {
        let engine = PredictiveIntentEngine::new();
        engine.observe("a", Intent::Greeting).await;
        engine.observe("b", Intent::Goodbye).await;
        // no a/b cross transition was counted
        let next = engine.predict_next(Intent::Greeting).await;
        assert_eq!(next[0].intent, Intent::SymptomDescription);
        engine.forget("a").await;
        assert!(engine.last_intent("a").await.is_none());
    }

    #[tokio::test]
    async fn test_history_capacity_drops_least_recently_observed() {
        let engine = PredictiveIntentEngine::with_capacity(2);
        engine.observe("a", Intent::Greeting).await;
        engine.observe("b", Intent::Greeting).await;
        engine.observe("a", Intent::SymptomDescription).await;
        engine.observe("c", Intent::Greeting).await;

        assert_eq!(engine.session_count().await, 2);
        assert!(engine.history("b").await.is_empty());
        assert_eq!(engine.history("a").await.len(), 2);
        assert_eq!(engine.last_intent("c").await, Some(Intent::Greeting));
        // counts survive the eviction
        let next = engine.predict_next(Intent::Greeting).await;
        assert_eq!(next[0].intent, Intent::SymptomDescription);
    }
}
