// =====================================================================================
// API KEY ROTATION
// =====================================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Round-robin over a vendor's API keys. Keys rejected by the vendor are
/// parked for a cool-down period and skipped until it elapses.
#[derive(Debug)]
pub struct KeyRing {
    keys: Vec<String>,
    cursor: AtomicUsize,
    failed_at: RwLock<HashMap<usize, Instant>>,
    cooldown: Duration,
}

impl KeyRing {
    pub fn new(keys: Vec<String>) -> Self {
        Self::with_cooldown(keys, DEFAULT_COOLDOWN)
    }

    /// Shuffled start order so several instances spread load across keys.
    pub fn shuffled(mut keys: Vec<String>) -> Self {
        keys.shuffle(&mut rand::thread_rng());
        Self::new(keys)
    }

    pub fn with_cooldown(keys: Vec<String>, cooldown: Duration) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
            failed_at: RwLock::new(HashMap::new()),
            cooldown,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Next usable key. When every key is cooling down, the one that failed
    /// longest ago is returned rather than nothing.
    pub async fn next_key(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }

        let failed = self.failed_at.read().await;
        let len = self.keys.len();
        for _ in 0..len {
            let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % len;
            let cooling = failed
                .get(&idx)
                .is_some_and(|at| at.elapsed() < self.cooldown);
            if !cooling {
                return Some(self.keys[idx].clone());
            }
        }

        let oldest = failed
            .iter()
            .min_by_key(|(_, at)| **at)
            .map(|(idx, _)| *idx)
            .unwrap_or(0);
        warn!("All {} keys cooling down, reusing key #{}", len, oldest);
        Some(self.keys[oldest].clone())
    }

    pub async fn mark_failed(&self, key: &str) {
        if let Some(idx) = self.keys.iter().position(|k| k == key) {
            debug!("Parking key #{} for {:?}", idx, self.cooldown);
            self.failed_at.write().await.insert(idx, Instant::now());
        }
    }

    pub async fn cooling_down(&self) -> usize {
        self.failed_at
            .read()
            .await
            .values()
            .filter(|at| at.elapsed() < self.cooldown)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(keys: &[&str]) -> KeyRing {
        KeyRing::new(keys.iter().map(|k| k.to_string()).collect())
    }

    #[tokio::test]
    async fn test_rotates_round_robin() {
        let ring = ring(&["a", "b", "c"]);
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(ring.next_key().await.unwrap());
        }
        assert_eq!(seen, vec!["a", "b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_skips_failed_key_during_cooldown() {
        let ring = ring(&["a", "b"]);
        ring.mark_failed("a").await;
        for _ in 0..3 {
            assert_eq!(ring.next_key().await.as_deref(), Some("b"));
        }
        assert_eq!(ring.cooling_down().await, 1);
    }

    #[tokio::test]
    async fn test_returns_oldest_failure_when_all_cooling() {
        let ring = ring(&["a", "b"]);
        ring.mark_failed("a").await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        ring.mark_failed("b").await;
        assert_eq!(ring.next_key().await.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_key_usable_again_after_cooldown() {
        let ring = KeyRing::with_cooldown(vec!["a".into()], Duration::ZERO);
        ring.mark_failed("a").await;
        assert_eq!(ring.cooling_down().await, 0);
        assert_eq!(ring.next_key().await.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_empty_ring_yields_nothing() {
        let ring = KeyRing::new(Vec::new());
        assert!(ring.next_key().await.is_none());
        assert!(ring.is_empty());
    }
}
