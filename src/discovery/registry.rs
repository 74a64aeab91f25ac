//! Dynamic locator backed by a Consul-style registry HTTP API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::discovery::{ServiceAddress, ServiceLocator};
use crate::error::{AppError, Result};

/// Locator querying a cluster membership service for passing instances
pub struct RegistryLocator {
    client: Client,
    endpoint: String,
}

/// One entry from the health endpoint
#[derive(Debug, Deserialize)]
struct HealthEntry {
    #[serde(rename = "Service")]
    service: HealthService,
}

#[derive(Debug, Deserialize)]
struct HealthService {
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Port")]
    port: u16,
}

/// Payload for agent service registration
#[derive(Debug, Serialize)]
struct RegisterPayload<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Port")]
    port: u16,
}

impl RegistryLocator {
    /// Create a locator against the registry's HTTP API base URL
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ServiceLocator for RegistryLocator {
    async fn resolve(&self, name: &str) -> Result<ServiceAddress> {
        let url = format!(
            "{}/v1/health/service/{}?passing=true",
            self.endpoint, name
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Registry(format!("Registry unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Registry(format!(
                "Registry returned {}",
                response.status()
            )));
        }

        let entries: Vec<HealthEntry> = response
            .json()
            .await
            .map_err(|e| AppError::Registry(format!("Malformed registry response: {}", e)))?;

        // First passing instance in registry order; no client-side balancing
        let entry = entries
            .first()
            .ok_or_else(|| AppError::DependencyUnavailable(name.to_string()))?;

        let address = ServiceAddress::new(entry.service.address.clone(), entry.service.port);
        debug!(service = %name, address = %address, instances = entries.len(), "Resolved from registry");
        Ok(address)
    }

    async fn register(&self, name: &str, address: &ServiceAddress) -> Result<()> {
        let url = format!("{}/v1/agent/service/register", self.endpoint);
        let payload = RegisterPayload {
            id: name,
            name,
            address: &address.host,
            port: address.port,
        };

        let response = self
            .client
            .put(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Registry(format!("Registry unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Registry(format!(
                "Registration rejected with {}",
                response.status()
            )));
        }

        info!(service = %name, address = %address, "Registered with service registry");
        Ok(())
    }

    async fn deregister(&self, name: &str) -> Result<()> {
        let url = format!("{}/v1/agent/service/deregister/{}", self.endpoint, name);

        let response = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(|e| AppError::Registry(format!("Registry unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Registry(format!(
                "Deregistration rejected with {}",
                response.status()
            )));
        }

        info!(service = %name, "Deregistered from service registry");
        Ok(())
    }
}
