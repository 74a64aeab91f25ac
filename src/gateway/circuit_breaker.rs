//! Circuit breaker guarding one downstream dependency
//!
//! Closed passes calls through and counts consecutive failures; reaching the
//! threshold opens the circuit, which fails fast until the cool-down elapses.
//! The first call after the cool-down runs as a single half-open trial whose
//! outcome decides between closing again and restarting the cool-down.

use parking_lot::Mutex;
use std::future::Future;
use tokio::time::{timeout, Duration, Instant};
use tracing::{info, warn};

use crate::error::{AppError, Result};

/// Breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls pass through
    Closed,
    /// Dependency assumed down, calls fail fast
    Open,
    /// A single trial call is probing the dependency
    HalfOpen,
}

struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    /// While Open: when the cool-down ends. While HalfOpen: when a stuck
    /// trial (dropped mid-flight) may be replaced by a new one.
    rearm_at: Option<Instant>,
}

/// Point-in-time view of the breaker, for logs and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSnapshot {
    pub state: CircuitState,
    pub consecutive_failures: u32,
}

/// Failure-isolating caller bound to one logical dependency
pub struct CircuitBreaker {
    dependency: String,
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a breaker opening after `failure_threshold` consecutive failures
    /// and staying open for `cooldown`
    pub fn new(dependency: impl Into<String>, failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            dependency: dependency.into(),
            failure_threshold: failure_threshold.max(1),
            cooldown,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                rearm_at: None,
            }),
        }
    }

    /// Run `op` under the breaker with a per-call deadline.
    ///
    /// Timeouts and operation errors both count as failures; a timed-out
    /// operation is abandoned, not cancelled downstream.
    pub async fn call<F, Fut, T>(&self, op: F, call_timeout: Duration) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.acquire()?;

        match timeout(call_timeout, op()).await {
            Ok(Ok(value)) => {
                self.on_success();
                Ok(value)
            }
            Ok(Err(e)) => {
                self.on_failure();
                Err(e)
            }
            Err(_) => {
                self.on_failure();
                Err(AppError::Timeout(format!(
                    "{} did not respond within {:?}",
                    self.dependency, call_timeout
                )))
            }
        }
    }

    /// Current state
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// Current state and failure count
    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.inner.lock();
        BreakerSnapshot {
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
        }
    }

    /// Decide whether this call may proceed; the Open -> HalfOpen transition
    /// happens here so exactly one caller wins the trial slot
    fn acquire(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let elapsed = inner
                    .rearm_at
                    .map(|at| Instant::now() >= at)
                    .unwrap_or(true);
                if elapsed {
                    inner.state = CircuitState::HalfOpen;
                    inner.rearm_at = Some(Instant::now() + self.cooldown);
                    info!(dependency = %self.dependency, "Circuit half-open, allowing trial call");
                    Ok(())
                } else {
                    Err(AppError::CircuitOpen(self.dependency.clone()))
                }
            }
            CircuitState::HalfOpen => {
                // A trial abandoned without reporting (task dropped) frees the
                // slot once its re-arm deadline passes
                let stale = inner
                    .rearm_at
                    .map(|at| Instant::now() >= at)
                    .unwrap_or(true);
                if stale {
                    inner.rearm_at = Some(Instant::now() + self.cooldown);
                    Ok(())
                } else {
                    Err(AppError::CircuitOpen(self.dependency.clone()))
                }
            }
        }
    }

    fn on_success(&self) {
        let mut inner = self.inner.lock();
        if inner.state != CircuitState::Closed {
            info!(dependency = %self.dependency, "Circuit closed after successful trial");
        }
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.rearm_at = None;
    }

    fn on_failure(&self) {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.rearm_at = Some(Instant::now() + self.cooldown);
                warn!(dependency = %self.dependency, "Trial call failed, circuit re-opened");
            }
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.rearm_at = Some(Instant::now() + self.cooldown);
                    warn!(
                        dependency = %self.dependency,
                        failures = inner.consecutive_failures,
                        "Circuit opened after consecutive failures"
                    );
                }
            }
            // A late failure from a call that raced the open transition
            CircuitState::Open => {}
        }
    }
}
