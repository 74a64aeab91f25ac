//! Driver Location Gateway
//!
//! Edge gateway between mobile driver clients and two collaborators: a
//! message stream ingesting location updates and a synchronous driver
//! liveness ("zombie") service reached through service discovery and a
//! circuit breaker.

pub mod api;
pub mod config;
pub mod discovery;
pub mod error;
pub mod gateway;
pub mod publish;

pub use error::{AppError, Result};

use std::sync::Arc;

use discovery::ServiceLocator;
use gateway::zombie::ZombieClient;
use publish::LocationPublisher;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub locator: Arc<dyn ServiceLocator>,
    pub zombie: Arc<ZombieClient>,
    pub publisher: Arc<dyn LocationPublisher>,
}

impl AppState {
    /// Wire the process-wide collaborators from settings
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let locator = discovery::from_config(&settings.discovery)?;
        let zombie = Arc::new(ZombieClient::new(&settings.zombie, locator.clone())?);
        let publisher: Arc<dyn LocationPublisher> =
            Arc::new(publish::nsq::NsqPublisher::new(&settings.publisher)?);

        Ok(Self {
            settings,
            locator,
            zombie,
            publisher,
        })
    }
}
