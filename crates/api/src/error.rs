//! API Error Types

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error};
use vehicle_service::ServiceError;

use crate::response::ListBody;

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Request could not be parsed into the expected types
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Service(ServiceError::NotFoundWithCriteria) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::ImpossibleMaxSpeed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// User-facing message; internal details are never exposed
    pub fn message(&self) -> String {
        match self {
            ApiError::Service(ServiceError::NotFound) => "Vehicle not found".to_string(),
            ApiError::Service(ServiceError::AlreadyExists(_)) => {
                "Vehicle identifier already exists".to_string()
            }
            ApiError::Service(ServiceError::NotFoundWithCriteria) => {
                "No vehicles found matching those criteria".to_string()
            }
            ApiError::Service(ServiceError::ImpossibleMaxSpeed(_)) => {
                "Speed malformed or out of range".to_string()
            }
            ApiError::Service(ServiceError::Internal(_)) => "Internal server error".to_string(),
            ApiError::BadRequest(detail) => format!("Bad request: {}", detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Request rejected ({}): {}", status, self);
        }

        let body = ListBody {
            message: self.message(),
            vehicles: Vec::new(),
            error: true,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!(
            "malformed or incomplete vehicle data ({})",
            rejection.body_text()
        ))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Errors that abort server startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Cannot load vehicles: {0}")]
    Loader(#[from] storage::LoaderError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Metrics setup failed: {0}")]
    Metrics(String),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
