//! Functional tests for the registry-backed service locator

use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use driver_location_gateway::config::Settings;
use driver_location_gateway::discovery::registry::RegistryLocator;
use driver_location_gateway::discovery::{ServiceAddress, ServiceLocator};
use driver_location_gateway::error::AppError;
use driver_location_gateway::gateway::zombie::ZombieClient;
use driver_location_gateway::publish::LocationPublisher;
use driver_location_gateway::{api, AppState};

fn locator(registry: &MockServer) -> RegistryLocator {
    RegistryLocator::new(registry.uri(), Duration::from_millis(500)).unwrap()
}

fn health_entry(address: &str, port: u16) -> serde_json::Value {
    serde_json::json!({
        "Service": { "Address": address, "Port": port }
    })
}

#[tokio::test]
async fn test_resolve_picks_first_passing_instance() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health/service/zombie-service"))
        .and(query_param("passing", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            health_entry("10.0.0.1", 1338),
            health_entry("10.0.0.2", 1338),
        ])))
        .mount(&registry)
        .await;

    let address = locator(&registry).resolve("zombie-service").await.unwrap();
    assert_eq!(address, ServiceAddress::new("10.0.0.1", 1338));
}

#[tokio::test]
async fn test_resolve_with_no_passing_instances_is_unavailable() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health/service/zombie-service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&registry)
        .await;

    let err = locator(&registry)
        .resolve("zombie-service")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DependencyUnavailable(_)));
}

#[tokio::test]
async fn test_resolve_with_failing_registry_is_registry_error() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health/service/zombie-service"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&registry)
        .await;

    let err = locator(&registry)
        .resolve("zombie-service")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Registry(_)));
}

#[tokio::test]
async fn test_register_and_deregister_hit_agent_endpoints() {
    let registry = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/agent/service/register"))
        .and(body_json(serde_json::json!({
            "ID": "driver-gateway",
            "Name": "driver-gateway",
            "Address": "10.0.0.9",
            "Port": 1337
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&registry)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/agent/service/deregister/driver-gateway"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&registry)
        .await;

    let locator = locator(&registry);
    locator
        .register("driver-gateway", &ServiceAddress::new("10.0.0.9", 1337))
        .await
        .unwrap();
    locator.deregister("driver-gateway").await.unwrap();
}

#[tokio::test]
async fn test_register_rejection_is_an_error() {
    let registry = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/agent/service/register"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&registry)
        .await;

    let err = locator(&registry)
        .register("driver-gateway", &ServiceAddress::new("10.0.0.9", 1337))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Registry(_)));
}

/// Publisher double for wiring a full app state
struct NullPublisher;

#[async_trait::async_trait]
impl LocationPublisher for NullPublisher {
    async fn publish(&self, _topic: &str, _payload: &[u8]) -> driver_location_gateway::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_empty_registry_maps_to_503_not_500() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health/service/zombie-service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&registry)
        .await;

    let settings = Settings::default();
    let locator: Arc<dyn ServiceLocator> =
        Arc::new(RegistryLocator::new(registry.uri(), Duration::from_millis(500)).unwrap());
    let zombie = Arc::new(ZombieClient::new(&settings.zombie, locator.clone()).unwrap());
    let state = Arc::new(AppState {
        settings,
        locator,
        zombie,
        publisher: Arc::new(NullPublisher),
    });
    let router = api::routes::create_router(state);

    let response = router
        .oneshot(
            axum::http::Request::builder()
                .uri("/drivers/42")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
}
