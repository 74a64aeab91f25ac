//! Publisher backed by nsqd's HTTP publish endpoint

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::PublisherConfig;
use crate::error::{AppError, Result};
use crate::publish::LocationPublisher;

/// Publishes records with `POST {nsqd}/pub?topic={topic}`
pub struct NsqPublisher {
    client: Client,
    endpoint: String,
}

impl NsqPublisher {
    pub fn new(config: &PublisherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.nsqd_endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LocationPublisher for NsqPublisher {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<()> {
        let url = format!("{}/pub?topic={}", self.endpoint, topic);

        let response = self
            .client
            .post(&url)
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| AppError::Publish(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Publish(format!(
                "nsqd returned {}",
                response.status()
            )));
        }

        debug!(topic = %topic, bytes = payload.len(), "Published location record");
        Ok(())
    }
}
