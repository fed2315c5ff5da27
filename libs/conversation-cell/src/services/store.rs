use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::ConversationSession;

/// Bounded in-memory session map. Inserting past capacity evicts the session
/// that has been inactive the longest.
pub struct SessionStore {
    capacity: usize,
    idle_timeout: Duration,
    sessions: RwLock<HashMap<Uuid, ConversationSession>>,
}

impl SessionStore {
    pub fn new(capacity: usize, idle_timeout: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            idle_timeout,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns the id of the session evicted to make room, if any.
    pub async fn insert(&self, session: ConversationSession) -> Option<Uuid> {
        let mut sessions = self.sessions.write().await;
        let mut evicted = None;
        if !sessions.contains_key(&session.id) && sessions.len() >= self.capacity {
            if let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.last_active)
                .map(|s| s.id)
            {
                sessions.remove(&oldest);
                debug!(session_id = %oldest, "Evicted least recently active session");
                evicted = Some(oldest);
            }
        }
        sessions.insert(session.id, session);
        evicted
    }

    pub async fn get(&self, id: Uuid) -> Option<ConversationSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Applies `f` to the session in place.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut ConversationSession) -> T) -> Option<T> {
        self.sessions.write().await.get_mut(&id).map(f)
    }

    pub async fn remove(&self, id: Uuid) -> Option<ConversationSession> {
        self.sessions.write().await.remove(&id)
    }

    pub async fn purge_idle(&self) -> Vec<Uuid> {
        self.purge_idle_at(Utc::now()).await
    }

    /// Drops sessions whose last activity is older than the idle timeout and
    /// returns their ids.
    pub async fn purge_idle_at(&self, now: DateTime<Utc>) -> Vec<Uuid> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<Uuid> = sessions
            .values()
            .filter(|s| now - s.last_active > self.idle_timeout)
            .map(|s| s.id)
            .collect();
        for id in &idle {
            sessions.remove(id);
        }
        if !idle.is_empty() {
            info!(purged = idle.len(), remaining = sessions.len(), "Purged idle conversations");
        }
        idle
    }
}
