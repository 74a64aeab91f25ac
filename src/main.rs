//! Main entry point for the driver location gateway

use driver_location_gateway::{
    api, config::Settings, discovery::ServiceAddress, AppState,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .init();

    info!("Starting driver location gateway");

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;
    info!(
        "Loaded configuration: server={}:{} discovery={}",
        settings.server.host, settings.server.port, settings.discovery.backend
    );

    let app_state = Arc::new(AppState::from_settings(settings)?);

    // Make this gateway discoverable; a registry that refuses us is fatal
    let self_name = app_state.settings.discovery.self_name.clone();
    let advertise_host = app_state
        .settings
        .server
        .advertise_host
        .clone()
        .unwrap_or_else(|| app_state.settings.server.host.clone());
    let self_address = ServiceAddress::new(advertise_host, app_state.settings.server.port);
    app_state
        .locator
        .register(&self_name, &self_address)
        .await?;

    // Build the router
    let app = api::routes::create_router(app_state.clone());

    let addr = format!(
        "{}:{}",
        app_state.settings.server.host, app_state.settings.server.port
    );
    info!("Server listening on {}", addr);

    // Serve until interrupted
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Best-effort cleanup; a stale registration ages out via health checks
    if let Err(e) = app_state.locator.deregister(&self_name).await {
        warn!(error = %e, "Failed to deregister from service registry");
    }

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
