//! Vehicle Routes

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use storage::{Vehicle, VehicleId};
use tracing::info;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

/// Query parameters for the weight filter
#[derive(Debug, Deserialize)]
pub struct WeightQuery {
    pub weight_min: f64,
    pub weight_max: f64,
}

/// Body of a speed update
#[derive(Debug, Deserialize)]
pub struct UpdateSpeedRequest {
    pub max_speed: i32,
}

/// List every vehicle
pub async fn get_all(State(state): State<Arc<AppState>>) -> Result<ApiResponse, ApiError> {
    let vehicles = state.service.get_all()?;
    Ok(ApiResponse::list(vehicles))
}

/// Get a single vehicle
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    path: Result<Path<VehicleId>, PathRejection>,
) -> Result<ApiResponse, ApiError> {
    let Path(id) = path?;
    let vehicle = state.service.get_by_id(id)?;

    Ok(ApiResponse::Vehicle {
        message: "Success",
        vehicle,
    })
}

/// Create one vehicle
pub async fn add_vehicle(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vehicle>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(vehicle) = body?;
    let vehicle = state.service.add_vehicle(vehicle)?;

    Ok(ApiResponse::Vehicle {
        message: "Success",
        vehicle,
    })
}

/// Create a batch of vehicles
pub async fn add_vehicles(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vec<Vehicle>>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(vehicles) = body?;
    let vehicles = state.service.add_vehicles(vehicles)?;

    Ok(ApiResponse::Vehicles {
        status: StatusCode::CREATED,
        message: "Vehicles created successfully",
        vehicles,
    })
}

/// Filter by exact color and year
pub async fn get_by_color_and_year(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> Result<ApiResponse, ApiError> {
    let Path((color, year)) = path?;
    let vehicles = state.service.get_by_color_and_year(&color, year)?;
    Ok(ApiResponse::list(vehicles))
}

/// Filter by brand and a `[start_year, end_year)` period
pub async fn get_by_brand_and_period(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, i32, i32)>, PathRejection>,
) -> Result<ApiResponse, ApiError> {
    let Path((brand, start, end)) = path?;
    let vehicles = state.service.get_by_brand_and_period(&brand, start, end)?;
    Ok(ApiResponse::list(vehicles))
}

/// Average max speed of a brand
pub async fn get_speed_average_by_brand(
    State(state): State<Arc<AppState>>,
    Path(brand): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let average = state.service.get_speed_average_by_brand(&brand)?;
    Ok(ApiResponse::Average(average))
}

/// Filter by fuel type
pub async fn get_by_fuel_type(
    State(state): State<Arc<AppState>>,
    Path(fuel_type): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let vehicles = state.service.get_by_fuel_type(&fuel_type)?;
    Ok(ApiResponse::list(vehicles))
}

/// Filter by an inclusive weight range
pub async fn get_by_weight(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WeightQuery>, QueryRejection>,
) -> Result<ApiResponse, ApiError> {
    let Query(range) = query?;
    let vehicles = state.service.get_by_weight(range.weight_min, range.weight_max)?;
    Ok(ApiResponse::list(vehicles))
}

/// Replace the max speed of a vehicle
pub async fn update_speed(
    State(state): State<Arc<AppState>>,
    path: Result<Path<VehicleId>, PathRejection>,
    body: Result<Json<UpdateSpeedRequest>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Path(id) = path?;
    let Json(request) =
        body.map_err(|_| ApiError::BadRequest("speed malformed or out of range".to_string()))?;

    let vehicle = state.service.update_speed(id, request.max_speed)?;
    Ok(ApiResponse::Vehicle {
        message: "Vehicle speed updated successfully",
        vehicle,
    })
}

/// Delete a vehicle
pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    path: Result<Path<VehicleId>, PathRejection>,
) -> Result<ApiResponse, ApiError> {
    let Path(id) = path?;
    let removed = state.service.delete_vehicle(id)?;

    info!("Vehicle {} ({} {}) removed", removed.id, removed.attributes.brand, removed.attributes.model);
    Ok(ApiResponse::Deleted)
}
