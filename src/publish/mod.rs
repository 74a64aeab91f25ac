//! Location stream publishing - collaborator trait and records

pub mod nsq;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Driver position as received from the client
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// One driver's position at a given time, as put on the stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverLocation {
    #[serde(rename = "driverID")]
    pub driver_id: i64,
    #[serde(flatten)]
    pub location: Location,
    pub updated_at: DateTime<Utc>,
}

/// Collaborator putting serialized records on the message stream.
///
/// Treated as a black box with at-least-once best-effort delivery; retry and
/// buffering are its concern, not the gateway's.
#[async_trait]
pub trait LocationPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<()>;
}
