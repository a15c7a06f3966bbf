//! Storage Layer
//!
//! In-memory vehicle store with repository pattern, plus the JSON bulk loader
//! that seeds it at startup.

mod loader;
mod model;
mod repository;

pub use loader::{JsonVehicleLoader, VehicleLoader};
pub use model::{
    is_valid_max_speed, Vehicle, VehicleAttributes, VehicleId, MAX_MAX_SPEED, MIN_MAX_SPEED,
};
pub use repository::{InMemoryVehicleRepository, VehicleRepository};

use thiserror::Error;

/// Repository errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("Vehicle not found")]
    NotFound,
    #[error("Vehicle identifier {0} already exists")]
    AlreadyExists(VehicleId),
    #[error("No vehicles found matching the criteria")]
    NotFoundWithCriteria,
    #[error("Max speed {0} is out of range [0, 400]")]
    ImpossibleMaxSpeed(i32),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Bulk loader errors
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed vehicle file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate vehicle id {0} in file")]
    DuplicateId(VehicleId),
}
