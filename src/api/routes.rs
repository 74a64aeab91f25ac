//! Router construction

use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::drivers;
use crate::AppState;

/// Build the application router over the shared state
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/drivers/:id",
            patch(drivers::update_location).get(drivers::get_zombie_status),
        )
        .route("/health", get(drivers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
