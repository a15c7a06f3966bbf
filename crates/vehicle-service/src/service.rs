//! Default Service Implementation

use crate::ServiceError;
use std::sync::Arc;
use storage::{Vehicle, VehicleId, VehicleRepository};
use tracing::debug;

/// Vehicle business operations exposed to the HTTP layer
pub trait VehicleService: Send + Sync {
    fn get_all(&self) -> Result<Vec<Vehicle>, ServiceError>;
    fn get_by_id(&self, id: VehicleId) -> Result<Vehicle, ServiceError>;
    fn add_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, ServiceError>;
    fn add_vehicles(&self, vehicles: Vec<Vehicle>) -> Result<Vec<Vehicle>, ServiceError>;
    fn get_by_color_and_year(&self, color: &str, year: i32) -> Result<Vec<Vehicle>, ServiceError>;
    fn get_by_brand_and_period(
        &self,
        brand: &str,
        start: i32,
        end: i32,
    ) -> Result<Vec<Vehicle>, ServiceError>;
    fn get_speed_average_by_brand(&self, brand: &str) -> Result<f64, ServiceError>;
    fn get_by_fuel_type(&self, fuel: &str) -> Result<Vec<Vehicle>, ServiceError>;
    fn get_by_weight(&self, min: f64, max: f64) -> Result<Vec<Vehicle>, ServiceError>;
    fn update_speed(&self, id: VehicleId, max_speed: i32) -> Result<Vehicle, ServiceError>;
    fn delete_vehicle(&self, id: VehicleId) -> Result<Vehicle, ServiceError>;
    /// Number of stored vehicles
    fn count(&self) -> Result<usize, ServiceError>;
}

/// Service backed directly by a repository
pub struct DefaultVehicleService {
    repository: Arc<dyn VehicleRepository>,
}

impl DefaultVehicleService {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        debug!("Creating vehicle service");
        Self { repository }
    }
}

impl VehicleService for DefaultVehicleService {
    fn get_all(&self) -> Result<Vec<Vehicle>, ServiceError> {
        Ok(self.repository.get_all()?)
    }

    fn get_by_id(&self, id: VehicleId) -> Result<Vehicle, ServiceError> {
        Ok(self.repository.get_by_id(id)?)
    }

    fn add_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, ServiceError> {
        Ok(self.repository.add_vehicle(vehicle)?)
    }

    fn add_vehicles(&self, vehicles: Vec<Vehicle>) -> Result<Vec<Vehicle>, ServiceError> {
        Ok(self.repository.add_vehicles(vehicles)?)
    }

    fn get_by_color_and_year(&self, color: &str, year: i32) -> Result<Vec<Vehicle>, ServiceError> {
        Ok(self.repository.get_by_color_and_year(color, year)?)
    }

    fn get_by_brand_and_period(
        &self,
        brand: &str,
        start: i32,
        end: i32,
    ) -> Result<Vec<Vehicle>, ServiceError> {
        Ok(self.repository.get_by_brand_and_period(brand, start, end)?)
    }

    fn get_speed_average_by_brand(&self, brand: &str) -> Result<f64, ServiceError> {
        Ok(self.repository.get_speed_average_by_brand(brand)?)
    }

    fn get_by_fuel_type(&self, fuel: &str) -> Result<Vec<Vehicle>, ServiceError> {
        Ok(self.repository.get_by_fuel_type(fuel)?)
    }

    fn get_by_weight(&self, min: f64, max: f64) -> Result<Vec<Vehicle>, ServiceError> {
        Ok(self.repository.get_by_weight(min, max)?)
    }

    fn update_speed(&self, id: VehicleId, max_speed: i32) -> Result<Vehicle, ServiceError> {
        Ok(self.repository.update_speed(id, max_speed)?)
    }

    fn delete_vehicle(&self, id: VehicleId) -> Result<Vehicle, ServiceError> {
        Ok(self.repository.delete_vehicle(id)?)
    }

    fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.repository.count()?)
    }
}
