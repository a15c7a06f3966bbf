//! Response Envelopes
//!
//! Every body is `{ message, <payload>, error }`. Lists carry their payload
//! under `vehicles`, single records and scalars under `data`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use storage::Vehicle;

/// Envelope for vehicle lists (and for all error responses)
#[derive(Debug, Serialize)]
pub struct ListBody {
    pub message: String,
    pub vehicles: Vec<Vehicle>,
    pub error: bool,
}

/// Envelope for a single record or scalar
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    pub message: String,
    pub data: T,
    pub error: bool,
}

/// Successful handler result, one variant per response shape
#[derive(Debug)]
pub enum ApiResponse {
    Vehicles {
        status: StatusCode,
        message: &'static str,
        vehicles: Vec<Vehicle>,
    },
    Vehicle {
        message: &'static str,
        vehicle: Vehicle,
    },
    Average(f64),
    /// 204 without a body
    Deleted,
}

impl ApiResponse {
    /// 200 list with the default message
    pub fn list(vehicles: Vec<Vehicle>) -> Self {
        ApiResponse::Vehicles {
            status: StatusCode::OK,
            message: "Success",
            vehicles,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self {
            ApiResponse::Vehicles {
                status,
                message,
                vehicles,
            } => (
                status,
                Json(ListBody {
                    message: message.to_string(),
                    vehicles,
                    error: false,
                }),
            )
                .into_response(),
            ApiResponse::Vehicle { message, vehicle } => Json(DataBody {
                message: message.to_string(),
                data: vehicle,
                error: false,
            })
            .into_response(),
            ApiResponse::Average(average) => Json(DataBody {
                message: "Success".to_string(),
                data: average,
                error: false,
            })
            .into_response(),
            ApiResponse::Deleted => StatusCode::NO_CONTENT.into_response(),
        }
    }
}
