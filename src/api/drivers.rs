//! Handlers for the /drivers/{id} surface

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::gateway::zombie::ZombieStatus;
use crate::publish::{DriverLocation, Location};
use crate::AppState;

/// Parse the `{id}` path segment, accepting the same shape as the original
/// `[0-9]+` route pattern
fn parse_driver_id(raw: &str) -> Result<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidDriverId(raw.to_string()));
    }
    raw.parse::<i64>()
        .map_err(|_| AppError::InvalidDriverId(raw.to_string()))
}

/// `PATCH /drivers/{id}` - validate, stamp, serialize, and publish a location update
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode> {
    let driver_id = parse_driver_id(&id).map_err(|e| {
        warn!(id = %id, "Rejected location update with bad driver id");
        e
    })?;

    let location: Location = serde_json::from_slice(&body)
        .map_err(|e| AppError::UnprocessableBody(e.to_string()))?;

    let record = DriverLocation {
        driver_id,
        location,
        updated_at: Utc::now(),
    };
    let payload = serde_json::to_vec(&record)
        .map_err(|e| AppError::Internal(format!("Failed to serialize record: {}", e)))?;

    state
        .publisher
        .publish(&state.settings.publisher.topic, &payload)
        .await?;

    info!(driver_id, "Published driver location");
    Ok(StatusCode::OK)
}

/// `GET /drivers/{id}` - resolve the zombie service and query it through the breaker
pub async fn get_zombie_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ZombieStatus>> {
    let driver_id = parse_driver_id(&id).map_err(|e| {
        warn!(id = %id, "Rejected zombie query with bad driver id");
        e
    })?;

    let status = state.zombie.query(driver_id).await?;
    Ok(Json(status))
}

/// `GET /health` - liveness probe, also used by the registry's health checks
pub async fn health() -> StatusCode {
    StatusCode::OK
}
