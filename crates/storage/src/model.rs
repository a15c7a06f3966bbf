//! Vehicle Entity Model

use serde::{Deserialize, Serialize};

/// Vehicle identifier, unique across the store
pub type VehicleId = i64;

/// Lowest accepted max speed (km/h)
pub const MIN_MAX_SPEED: i32 = 0;

/// Highest accepted max speed (km/h)
pub const MAX_MAX_SPEED: i32 = 400;

/// Attribute bundle stored for each vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleAttributes {
    pub brand: String,
    pub model: String,
    pub registration: String,
    pub year: i32,
    pub color: String,
    /// Max speed in km/h
    pub max_speed: i32,
    pub fuel_type: String,
    pub transmission: String,
    pub passengers: i32,
    pub height: f64,
    pub width: f64,
    /// Weight in kg
    pub weight: f64,
}

/// A vehicle: identifier plus its attributes.
///
/// Serializes flat, with `id` next to the attribute fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    #[serde(flatten)]
    pub attributes: VehicleAttributes,
}

impl Vehicle {
    pub fn new(id: VehicleId, attributes: VehicleAttributes) -> Self {
        Self { id, attributes }
    }
}

/// Whether a max speed lies inside the accepted range
pub fn is_valid_max_speed(speed: i32) -> bool {
    (MIN_MAX_SPEED..=MAX_MAX_SPEED).contains(&speed)
}

impl Default for VehicleAttributes {
    fn default() -> Self {
        Self {
            brand: String::new(),
            model: String::new(),
            registration: String::new(),
            year: 0,
            color: String::new(),
            max_speed: 0,
            fuel_type: String::new(),
            transmission: String::new(),
            passengers: 0,
            height: 0.0,
            width: 0.0,
            weight: 0.0,
        }
    }
}
