//! Service discovery - locator trait, static table, and registry client

pub mod registry;
pub mod static_table;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::config::DiscoveryConfig;
use crate::error::{AppError, Result};

/// A resolved `host:port` pair, valid for a single call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAddress {
    pub host: String,
    pub port: u16,
}

impl ServiceAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a "host:port" string
    pub fn parse(s: &str) -> Result<Self> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| AppError::Internal(format!("Malformed service address '{}'", s)))?;
        let port: u16 = port
            .parse()
            .map_err(|_| AppError::Internal(format!("Malformed port in address '{}'", s)))?;
        if host.is_empty() {
            return Err(AppError::Internal(format!(
                "Empty host in address '{}'",
                s
            )));
        }
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Locator for mapping logical service names to healthy addresses.
///
/// `resolve` is called per request; no caching happens behind this trait so
/// membership changes are picked up immediately.
#[async_trait]
pub trait ServiceLocator: Send + Sync {
    /// Resolve a logical service name to a currently healthy address
    async fn resolve(&self, name: &str) -> Result<ServiceAddress>;

    /// Make `address` discoverable under `name`
    async fn register(&self, name: &str, address: &ServiceAddress) -> Result<()>;

    /// Remove the registration for `name`
    async fn deregister(&self, name: &str) -> Result<()>;
}

/// Build the locator selected by configuration
pub fn from_config(config: &DiscoveryConfig) -> Result<Arc<dyn ServiceLocator>> {
    match config.backend.as_str() {
        "static" => Ok(Arc::new(static_table::StaticLocator::new(
            &config.static_services,
        )?)),
        "registry" => {
            let endpoint = config.registry_endpoint.clone().ok_or_else(|| {
                AppError::Config(config::ConfigError::Message(
                    "Registry backend requires discovery.registry_endpoint".to_string(),
                ))
            })?;
            Ok(Arc::new(registry::RegistryLocator::new(
                endpoint,
                std::time::Duration::from_millis(config.timeout_ms),
            )?))
        }
        other => Err(AppError::Config(config::ConfigError::Message(format!(
            "Invalid discovery backend '{}'",
            other
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let addr = ServiceAddress::parse("10.0.0.7:1338").unwrap();
        assert_eq!(addr.host, "10.0.0.7");
        assert_eq!(addr.port, 1338);
        assert_eq!(addr.to_string(), "10.0.0.7:1338");
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(ServiceAddress::parse("no-port-here").is_err());
        assert!(ServiceAddress::parse(":1338").is_err());
        assert!(ServiceAddress::parse("host:notaport").is_err());
    }
}
