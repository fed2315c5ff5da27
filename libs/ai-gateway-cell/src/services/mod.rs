pub mod cache;
pub mod circuit_breaker;
pub mod fallbacks;
pub mod key_ring;
pub mod manager;
pub mod nutrition;
pub mod prompts;
pub mod providers;

pub use cache::ResponseCache;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use key_ring::KeyRing;
pub use manager::AiServiceManager;
pub use nutrition::NutritionAdvisor;
pub use providers::{LlmProvider, ProviderError};
