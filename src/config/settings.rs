//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub discovery: DiscoveryConfig,
    pub zombie: ZombieConfig,
    pub publisher: PublisherConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Address other services should use to reach this gateway; defaults to `host`
    #[serde(default)]
    pub advertise_host: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1337
}

/// Service discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Locator backend: "static" or "registry"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Base URL of the registry HTTP API (registry backend only)
    #[serde(default)]
    pub registry_endpoint: Option<String>,
    /// Logical name this gateway registers itself under (registry backend only)
    #[serde(default = "default_self_name")]
    pub self_name: String,
    /// Fixed name -> "host:port" table (static backend only)
    #[serde(default)]
    pub static_services: std::collections::HashMap<String, String>,
    #[serde(default = "default_registry_timeout")]
    pub timeout_ms: u64,
}

fn default_backend() -> String {
    "static".to_string()
}

fn default_self_name() -> String {
    "driver-gateway".to_string()
}

fn default_registry_timeout() -> u64 {
    2000
}

/// Zombie status service client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZombieConfig {
    /// Logical service name resolved through the locator
    #[serde(default = "default_zombie_service")]
    pub service_name: String,
    #[serde(default = "default_call_timeout")]
    pub call_timeout_ms: u64,
    #[serde(default)]
    pub breaker: BreakerConfig,
}

fn default_zombie_service() -> String {
    "zombie-service".to_string()
}

fn default_call_timeout() -> u64 {
    1000
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// How long the circuit stays open before allowing a trial call
    #[serde(default = "default_cooldown")]
    pub cooldown_ms: u64,
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_cooldown() -> u64 {
    10_000
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            cooldown_ms: default_cooldown(),
        }
    }
}

/// Location stream publisher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublisherConfig {
    /// Base URL of the nsqd HTTP endpoint
    #[serde(default = "default_nsqd")]
    pub nsqd_endpoint: String,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_publish_timeout")]
    pub timeout_ms: u64,
}

fn default_nsqd() -> String {
    "http://127.0.0.1:4151".to_string()
}

fn default_topic() -> String {
    "topic_location".to_string()
}

fn default_publish_timeout() -> u64 {
    2000
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 1337)?
            .set_default("discovery.backend", "static")?
            .set_default("zombie.service_name", "zombie-service")?
            .set_default("publisher.topic", "topic_location")?
            // Load from configuration file
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with DRIVER_GATEWAY__)
            .add_source(
                Environment::with_prefix("DRIVER_GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        match self.discovery.backend.as_str() {
            "static" => {
                if !self
                    .discovery
                    .static_services
                    .contains_key(&self.zombie.service_name)
                {
                    return Err(AppError::Config(config::ConfigError::Message(format!(
                        "Static locator has no address for service '{}'",
                        self.zombie.service_name
                    ))));
                }
            }
            "registry" => {
                if self.discovery.registry_endpoint.is_none() {
                    return Err(AppError::Config(config::ConfigError::Message(
                        "Registry backend requires discovery.registry_endpoint".to_string(),
                    )));
                }
            }
            other => {
                return Err(AppError::Config(config::ConfigError::Message(format!(
                    "Invalid discovery backend '{}'. Must be 'static' or 'registry'",
                    other
                ))));
            }
        }

        if self.zombie.breaker.failure_threshold == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Breaker failure threshold must be at least 1".to_string(),
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        let mut static_services = std::collections::HashMap::new();
        static_services.insert(
            default_zombie_service(),
            "127.0.0.1:1338".to_string(),
        );
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                advertise_host: None,
            },
            discovery: DiscoveryConfig {
                backend: default_backend(),
                registry_endpoint: None,
                self_name: default_self_name(),
                static_services,
                timeout_ms: default_registry_timeout(),
            },
            zombie: ZombieConfig {
                service_name: default_zombie_service(),
                call_timeout_ms: default_call_timeout(),
                breaker: BreakerConfig::default(),
            },
            publisher: PublisherConfig {
                nsqd_endpoint: default_nsqd(),
                topic: default_topic(),
                timeout_ms: default_publish_timeout(),
            },
        }
    }
}
