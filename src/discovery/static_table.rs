//! Static locator backed by a fixed name -> address table

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::discovery::{ServiceAddress, ServiceLocator};
use crate::error::{AppError, Result};

/// Locator resolving from addresses baked into configuration
pub struct StaticLocator {
    services: HashMap<String, ServiceAddress>,
}

impl StaticLocator {
    /// Build from the configured "host:port" strings, failing on malformed entries
    pub fn new(services: &HashMap<String, String>) -> Result<Self> {
        let mut table = HashMap::with_capacity(services.len());
        for (name, addr) in services {
            table.insert(name.clone(), ServiceAddress::parse(addr)?);
        }
        Ok(Self { services: table })
    }
}

#[async_trait]
impl ServiceLocator for StaticLocator {
    async fn resolve(&self, name: &str) -> Result<ServiceAddress> {
        let address = self
            .services
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::DependencyUnavailable(name.to_string()))?;
        debug!(service = %name, address = %address, "Resolved from static table");
        Ok(address)
    }

    // Static deployments are discoverable by configuration alone
    async fn register(&self, _name: &str, _address: &ServiceAddress) -> Result<()> {
        Ok(())
    }

    async fn deregister(&self, _name: &str) -> Result<()> {
        Ok(())
    }
}
