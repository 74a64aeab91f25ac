//! Client for the downstream driver liveness ("zombie") service

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::ZombieConfig;
use crate::discovery::ServiceLocator;
use crate::error::{AppError, Result};
use crate::gateway::circuit_breaker::{BreakerSnapshot, CircuitBreaker};

/// Downstream verdict on whether a driver is inactive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZombieStatus {
    pub id: i64,
    pub zombie: bool,
}

/// Resilient client composing the locator and the circuit breaker.
///
/// Every query re-resolves the service address; the breaker is the one
/// process-wide piece of state, bound to this single dependency.
pub struct ZombieClient {
    client: Client,
    locator: Arc<dyn ServiceLocator>,
    breaker: CircuitBreaker,
    service_name: String,
    call_timeout: Duration,
}

impl ZombieClient {
    pub fn new(config: &ZombieConfig, locator: Arc<dyn ServiceLocator>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            locator,
            breaker: CircuitBreaker::new(
                config.service_name.clone(),
                config.breaker.failure_threshold,
                Duration::from_millis(config.breaker.cooldown_ms),
            ),
            service_name: config.service_name.clone(),
            call_timeout: Duration::from_millis(config.call_timeout_ms),
        })
    }

    /// Ask the zombie service whether `driver_id` is inactive
    pub async fn query(&self, driver_id: i64) -> Result<ZombieStatus> {
        let address = self.locator.resolve(&self.service_name).await?;
        let url = format!("http://{}/drivers/{}", address, driver_id);

        debug!(driver_id, url = %url, "Querying zombie status");

        // The breaker governs the round trip only; decoding happens outside
        // it so a reachable peer sending garbage does not open the circuit
        let body = self
            .breaker
            .call(
                || async {
                    let response = self
                        .client
                        .get(&url)
                        .send()
                        .await
                        .map_err(|e| AppError::Transport(e.to_string()))?;

                    if !response.status().is_success() {
                        return Err(AppError::Transport(format!(
                            "{} returned {}",
                            self.service_name,
                            response.status()
                        )));
                    }

                    response
                        .bytes()
                        .await
                        .map_err(|e| AppError::Transport(e.to_string()))
                },
                self.call_timeout,
            )
            .await?;

        let status: ZombieStatus = serde_json::from_slice(&body)
            .map_err(|e| AppError::Decode(format!("Malformed zombie response: {}", e)))?;

        Ok(status)
    }

    /// Breaker state and failure count, for the status endpoint and tests
    pub fn breaker_snapshot(&self) -> BreakerSnapshot {
        self.breaker.snapshot()
    }
}
