//! Vehicle Business Service
//!
//! Facade over the vehicle repository. Every operation is a pass-through that
//! re-kinds repository errors into service errors.

mod service;

pub use service::{DefaultVehicleService, VehicleService};

use storage::{RepositoryError, VehicleId};
use thiserror::Error;

/// Service errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("Vehicle not found")]
    NotFound,
    #[error("Vehicle identifier {0} already exists")]
    AlreadyExists(VehicleId),
    #[error("No vehicles found matching the criteria")]
    NotFoundWithCriteria,
    #[error("Max speed {0} is malformed or out of range")]
    ImpossibleMaxSpeed(i32),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::AlreadyExists(id) => ServiceError::AlreadyExists(id),
            RepositoryError::NotFoundWithCriteria => ServiceError::NotFoundWithCriteria,
            RepositoryError::ImpossibleMaxSpeed(speed) => ServiceError::ImpossibleMaxSpeed(speed),
            RepositoryError::Internal(reason) => ServiceError::Internal(reason),
        }
    }
}
