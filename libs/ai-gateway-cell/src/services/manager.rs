// =====================================================================================
// AI SERVICE MANAGER - SEQUENTIAL VENDOR FALLBACK
// =====================================================================================

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use shared_config::AppConfig;

use crate::error::{AiGatewayError, ProviderFailure};
use crate::models::{GatewayStatus, LlmRequest, LlmResponse, ProviderStatus};
use crate::services::cache::ResponseCache;
use crate::services::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::services::key_ring::KeyRing;
use crate::services::providers::{providers_from_config, LlmProvider};

struct ProviderSlot {
    provider: Box<dyn LlmProvider>,
    keys: KeyRing,
    breaker: CircuitBreaker,
}

pub struct AiServiceManager {
    slots: Vec<ProviderSlot>,
    cache: ResponseCache,
    request_timeout: Duration,
}

impl AiServiceManager {
    pub fn new(config: &AppConfig) -> Self {
        let slots = providers_from_config(config)
            .into_iter()
            .map(|provider| {
                let keys = KeyRing::shuffled(config.keys_for(provider.kind()).to_vec());
                (provider, keys)
            })
            .collect::<Vec<_>>();

        let manager = Self::with_providers(
            slots,
            ResponseCache::new(
                config.ai_cache_capacity,
                Duration::from_secs(config.ai_cache_ttl_secs),
            ),
            Duration::from_secs(config.ai_request_timeout_secs.max(1)),
        );

        info!(
            "AI gateway ready with providers: [{}]",
            manager
                .slots
                .iter()
                .map(|s| s.provider.kind().as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        manager
    }

    /// Assembles a manager from explicit providers, in fallback order.
    pub fn with_providers(
        providers: Vec<(Box<dyn LlmProvider>, KeyRing)>,
        cache: ResponseCache,
        request_timeout: Duration,
    ) -> Self {
        let slots = providers
            .into_iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(provider, keys)| ProviderSlot {
                breaker: CircuitBreaker::new(provider.kind().as_str(), CircuitBreakerConfig::default()),
                provider,
                keys,
            })
            .collect();

        Self {
            slots,
            cache,
            request_timeout,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Sends the request to the first provider that answers, in configured
    /// order. Each provider gets one attempt per key when its keys are
    /// rejected; any other failure moves on to the next provider.
    #[instrument(skip(self, request), fields(json = request.json_mode, vision = request.image.is_some()))]
    pub async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AiGatewayError> {
        if request.prompt.trim().is_empty() {
            return Err(AiGatewayError::InvalidRequest("prompt is empty".to_string()));
        }

        let cache_key = ResponseCache::key_for(request);
        if let Some(key) = &cache_key {
            if let Some(hit) = self.cache.get(key).await {
                debug!("Cache hit from {}", hit.provider);
                return Ok(hit);
            }
        }

        let vision = request.image.is_some();
        let candidates: Vec<&ProviderSlot> = self
            .slots
            .iter()
            .filter(|s| !vision || s.provider.supports_vision())
            .collect();

        if candidates.is_empty() {
            let what = if vision { "no vision-capable provider configured" } else { "no provider configured" };
            return Err(AiGatewayError::NoProviderAvailable(what.to_string()));
        }

        let mut failures = Vec::new();
        for slot in candidates {
            let kind = slot.provider.kind();
            if !slot.breaker.allow().await {
                failures.push(ProviderFailure { provider: kind, reason: "circuit open".to_string() });
                continue;
            }

            match self.try_provider(slot, request).await {
                Ok(text) => {
                    slot.breaker.record_success().await;
                    let response = LlmResponse {
                        provider: kind,
                        model: slot.provider.model().to_string(),
                        text,
                        cached: false,
                    };
                    if let Some(key) = cache_key {
                        self.cache.insert(key, response.clone()).await;
                    }
                    return Ok(response);
                }
                Err(reason) => {
                    slot.breaker.record_failure().await;
                    warn!("Provider {} failed: {}", kind, reason);
                    failures.push(ProviderFailure { provider: kind, reason });
                }
            }
        }

        Err(AiGatewayError::AllProvidersFailed(failures))
    }

    async fn try_provider(&self, slot: &ProviderSlot, request: &LlmRequest) -> Result<String, String> {
        let mut last_error = String::from("no usable key");

        for attempt in 0..slot.keys.len() {
            let Some(key) = slot.keys.next_key().await else {
                break;
            };

            let outcome = tokio::time::timeout(self.request_timeout, slot.provider.complete(request, &key)).await;
            match outcome {
                Ok(Ok(text)) if !text.trim().is_empty() => return Ok(text),
                Ok(Ok(_)) => return Err("empty response".to_string()),
                Ok(Err(err)) if err.is_key_rejection() => {
                    slot.keys.mark_failed(&key).await;
                    debug!(
                        "{} rejected key (attempt {}/{}): {}",
                        slot.provider.kind(),
                        attempt + 1,
                        slot.keys.len(),
                        err
                    );
                    last_error = err.to_string();
                }
                Ok(Err(err)) => return Err(err.to_string()),
                Err(_) => return Err(format!("timed out after {:?}", self.request_timeout)),
            }
        }

        Err(last_error)
    }

    pub async fn status(&self) -> GatewayStatus {
        let mut providers = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            providers.push(ProviderStatus {
                provider: slot.provider.kind(),
                model: slot.provider.model().to_string(),
                key_count: slot.keys.len(),
                keys_cooling_down: slot.keys.cooling_down().await,
                circuit: slot.breaker.state().await.to_string(),
                supports_vision: slot.provider.supports_vision(),
            });
        }

        GatewayStatus {
            providers,
            cache_entries: self.cache.len().await,
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
        }
    }
}
