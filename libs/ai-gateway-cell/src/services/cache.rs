// =====================================================================================
// LLM RESPONSE CACHE
// =====================================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{LlmRequest, LlmResponse};

#[derive(Debug)]
struct CacheEntry {
    response: LlmResponse,
    inserted_at: Instant,
    last_access: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    clock: u64,
}

/// Bounded LRU cache with a time-to-live, keyed by a digest of the prompt.
#[derive(Debug)]
pub struct ResponseCache {
    inner: RwLock<CacheInner>,
    capacity: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
            capacity,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Vision requests are never cached; `None` means "do not cache".
    pub fn key_for(request: &LlmRequest) -> Option<String> {
        if request.image.is_some() {
            return None;
        }
        let mut hasher = Sha256::new();
        hasher.update(request.system.as_bytes());
        hasher.update([0u8]);
        hasher.update(request.prompt.as_bytes());
        hasher.update([0u8, request.json_mode as u8]);
        Some(format!("{:x}", hasher.finalize()))
    }

    pub async fn get(&self, key: &str) -> Option<LlmResponse> {
        let mut inner = self.inner.write().await;
        inner.clock += 1;
        let tick = inner.clock;

        let expired = match inner.entries.get_mut(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                entry.last_access = tick;
                self.hits.fetch_add(1, Ordering::Relaxed);
                let mut response = entry.response.clone();
                response.cached = true;
                return Some(response);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.entries.remove(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub async fn insert(&self, key: String, response: LlmResponse) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.write().await;
        inner.clock += 1;
        let tick = inner.clock;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            self.evict(&mut inner);
        }

        inner.entries.insert(
            key,
            CacheEntry {
                response,
                inserted_at: Instant::now(),
                last_access: tick,
            },
        );
    }

    /// Drops expired entries; if none expired, drops the least recently used.
    fn evict(&self, inner: &mut CacheInner) {
        let before = inner.entries.len();
        let ttl = self.ttl;
        inner.entries.retain(|_, e| e.inserted_at.elapsed() < ttl);
        if inner.entries.len() < before {
            debug!("Evicted {} expired cache entries", before - inner.entries.len());
            return;
        }

        let lru = inner
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone());
        if let Some(key) = lru {
            inner.entries.remove(&key);
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
