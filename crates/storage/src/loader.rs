//! Bulk Loader
//!
//! Reads the initial vehicle store from a JSON file.

use crate::model::{Vehicle, VehicleAttributes, VehicleId};
use crate::LoaderError;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Source of the initial vehicle store
pub trait VehicleLoader {
    fn load(&self) -> Result<HashMap<VehicleId, VehicleAttributes>, LoaderError>;
}

/// Loads vehicles from a JSON array of flat vehicle objects
#[derive(Debug, Clone)]
pub struct JsonVehicleLoader {
    path: PathBuf,
}

impl JsonVehicleLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl VehicleLoader for JsonVehicleLoader {
    fn load(&self) -> Result<HashMap<VehicleId, VehicleAttributes>, LoaderError> {
        let file = File::open(&self.path).map_err(|e| LoaderError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let vehicles: Vec<Vehicle> = serde_json::from_reader(BufReader::new(file))?;

        let mut db = HashMap::with_capacity(vehicles.len());
        for vehicle in vehicles {
            if db.insert(vehicle.id, vehicle.attributes).is_some() {
                return Err(LoaderError::DuplicateId(vehicle.id));
            }
        }

        info!("Loaded {} vehicles from {}", db.len(), self.path.display());
        Ok(db)
    }
}
