//! HTTP tests for the Prometheus endpoint
//!
//! The recorder is process-global, so these live in their own test binary.

use api::{create_router, init_metrics, AppState};
use reqwest::StatusCode;
use std::sync::Arc;
use storage::{InMemoryVehicleRepository, Vehicle, VehicleAttributes};
use vehicle_service::DefaultVehicleService;

#[tokio::test]
async fn test_metrics_exposes_request_counters() {
    let vehicle = Vehicle::new(
        1,
        VehicleAttributes {
            brand: "Toyota".to_string(),
            year: 2020,
            max_speed: 180,
            ..Default::default()
        },
    );
    let db = [(vehicle.id, vehicle.attributes)].into_iter().collect();
    let repository = Arc::new(InMemoryVehicleRepository::new(db));
    let service = Arc::new(DefaultVehicleService::new(repository));
    let state = AppState::new(service).with_metrics(init_metrics().unwrap());
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let resp = reqwest::get(format!("http://{}/api/v1/vehicles", addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = reqwest::get(format!("http://{}/metrics", addr)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("path=\"/api/v1/vehicles\""));
}
