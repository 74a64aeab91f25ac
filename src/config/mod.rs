//! Configuration module

pub mod settings;

pub use settings::{
    BreakerConfig, DiscoveryConfig, PublisherConfig, ServerConfig, Settings, ZombieConfig,
};
