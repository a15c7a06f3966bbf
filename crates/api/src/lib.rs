//! Vehicle Catalogue API Server
//!
//! REST API over the vehicle store: listing, filtering, aggregation and
//! mutation endpoints under `/api/v1/vehicles`.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use storage::{InMemoryVehicleRepository, JsonVehicleLoader, VehicleLoader};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{info, warn};
use vehicle_service::{DefaultVehicleService, VehicleService};

mod error;
mod response;
mod routes;
mod settings;
mod telemetry;

pub use error::{ApiError, StartupError};
pub use response::{ApiResponse, DataBody, ListBody};
pub use settings::{AppConfig, LogFormat, CONFIG_PATH_ENV};
pub use telemetry::{init_logging, init_metrics};

use routes::vehicles;

/// Application state shared across handlers
pub struct AppState {
    /// Vehicle business service
    pub service: Arc<dyn VehicleService>,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(service: Arc<dyn VehicleService>) -> Self {
        Self {
            service,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Expose `handle` on `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    /// Absent when the store cannot be read
    pub vehicle_count: Option<usize>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route(
            "/api/v1/vehicles",
            get(vehicles::get_all).post(vehicles::add_vehicle),
        )
        .route("/api/v1/vehicles/batch", post(vehicles::add_vehicles))
        .route("/api/v1/vehicles/weight", get(vehicles::get_by_weight))
        .route(
            "/api/v1/vehicles/color/:color/year/:year",
            get(vehicles::get_by_color_and_year),
        )
        .route(
            "/api/v1/vehicles/brand/:brand/between/:start_year/:end_year",
            get(vehicles::get_by_brand_and_period),
        )
        .route(
            "/api/v1/vehicles/average_speed/brand/:brand",
            get(vehicles::get_speed_average_by_brand),
        )
        .route(
            "/api/v1/vehicles/fuel_type/:type",
            get(vehicles::get_by_fuel_type),
        )
        .route(
            "/api/v1/vehicles/:id",
            get(vehicles::get_by_id).delete(vehicles::delete_vehicle),
        )
        .route(
            "/api/v1/vehicles/:id/update_speed",
            put(vehicles::update_speed),
        )
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(telemetry::track_requests))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let (code, status, vehicle_count) = match state.service.count() {
        Ok(count) => (StatusCode::OK, "healthy", Some(count)),
        Err(e) => {
            warn!("Health check cannot read the store: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", None)
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        vehicle_count,
    };

    (code, Json(response))
}

/// Prometheus scrape endpoint
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Load the store and run the server until Ctrl-C
pub async fn run_server(config: &AppConfig) -> Result<(), StartupError> {
    let db = JsonVehicleLoader::new(&config.vehicles_file).load()?;
    let repository = Arc::new(InMemoryVehicleRepository::new(db));
    let service = Arc::new(DefaultVehicleService::new(repository));

    let state = Arc::new(AppState::new(service).with_metrics(init_metrics()?));
    let app = create_router(state);

    info!("Starting API server on {}", config.server_addr);

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
