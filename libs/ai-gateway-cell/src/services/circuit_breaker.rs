// =====================================================================================
// CIRCUIT BREAKER FOR AI VENDORS
// =====================================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u64,
    pub recovery_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    state: RwLock<CircuitState>,
    failure_count: AtomicU64,
    last_failure_time: RwLock<Option<Instant>>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(CircuitState::Closed),
            failure_count: AtomicU64::new(0),
            last_failure_time: RwLock::new(None),
            config,
        }
    }

    pub async fn state(&self) -> CircuitState {
        *self.state.read().await
    }

    /// Whether a call may go through. An open breaker moves to half-open
    /// once the recovery timeout has passed since the last failure.
    pub async fn allow(&self) -> bool {
        let current = *self.state.read().await;
        match current {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let recovered = self
                    .last_failure_time
                    .read()
                    .await
                    .is_some_and(|at| at.elapsed() >= self.config.recovery_timeout);
                if recovered {
                    *self.state.write().await = CircuitState::HalfOpen;
                    info!("Circuit for {} half-open, probing", self.name);
                }
                recovered
            }
        }
    }

    pub async fn record_success(&self) {
        self.failure_count.store(0, Ordering::SeqCst);
        let mut state = self.state.write().await;
        if *state != CircuitState::Closed {
            info!("Circuit for {} closed after successful probe", self.name);
            *state = CircuitState::Closed;
        }
    }

    pub async fn record_failure(&self) {
        let failures = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_failure_time.write().await = Some(Instant::now());

        let mut state = self.state.write().await;
        let trip = *state == CircuitState::HalfOpen || failures >= self.config.failure_threshold;
        if trip && *state != CircuitState::Open {
            warn!("Circuit for {} opened after {} failures", self.name, failures);
            *state = CircuitState::Open;
        }
    }
}
