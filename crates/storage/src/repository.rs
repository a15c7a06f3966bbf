//! Repository Implementation

use crate::model::{is_valid_max_speed, Vehicle, VehicleAttributes, VehicleId};
use crate::RepositoryError;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Data access for vehicles.
///
/// Filter and aggregate queries are full scans; result order is unspecified.
pub trait VehicleRepository: Send + Sync {
    /// All stored vehicles. Fails with `NotFound` when the store is empty.
    fn get_all(&self) -> Result<Vec<Vehicle>, RepositoryError>;

    /// Vehicle with the given id
    fn get_by_id(&self, id: VehicleId) -> Result<Vehicle, RepositoryError>;

    /// Insert a single vehicle
    fn add_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, RepositoryError>;

    /// Insert a batch; nothing is inserted if any id collides
    fn add_vehicles(&self, vehicles: Vec<Vehicle>) -> Result<Vec<Vehicle>, RepositoryError>;

    fn get_by_color_and_year(&self, color: &str, year: i32)
        -> Result<Vec<Vehicle>, RepositoryError>;

    /// Vehicles of `brand` built in `[start, end)`
    fn get_by_brand_and_period(
        &self,
        brand: &str,
        start: i32,
        end: i32,
    ) -> Result<Vec<Vehicle>, RepositoryError>;

    /// Mean max speed over the vehicles of `brand`
    fn get_speed_average_by_brand(&self, brand: &str) -> Result<f64, RepositoryError>;

    fn get_by_fuel_type(&self, fuel: &str) -> Result<Vec<Vehicle>, RepositoryError>;

    /// Vehicles with weight in `[min, max]`
    fn get_by_weight(&self, min: f64, max: f64) -> Result<Vec<Vehicle>, RepositoryError>;

    /// Overwrite the max speed of an existing vehicle and return the updated record
    fn update_speed(&self, id: VehicleId, max_speed: i32) -> Result<Vehicle, RepositoryError>;

    /// Remove a vehicle and return its last state
    fn delete_vehicle(&self, id: VehicleId) -> Result<Vehicle, RepositoryError>;

    /// Number of stored vehicles
    fn count(&self) -> Result<usize, RepositoryError>;
}

/// Vehicle store held in memory behind a single lock
pub struct InMemoryVehicleRepository {
    /// Vehicle attributes by id
    db: Mutex<HashMap<VehicleId, VehicleAttributes>>,
}

impl InMemoryVehicleRepository {
    /// Create a repository seeded with `db`
    pub fn new(db: HashMap<VehicleId, VehicleAttributes>) -> Self {
        info!("Creating in-memory vehicle repository with {} vehicles", db.len());
        Self { db: Mutex::new(db) }
    }

    fn db(&self) -> Result<MutexGuard<'_, HashMap<VehicleId, VehicleAttributes>>, RepositoryError> {
        self.db
            .lock()
            .map_err(|e| RepositoryError::Internal(format!("Lock error: {}", e)))
    }

    /// Scan all vehicles and keep the ones matching `predicate`
    fn find_where<F>(&self, predicate: F) -> Result<Vec<Vehicle>, RepositoryError>
    where
        F: Fn(&Vehicle) -> bool,
    {
        let matched: Vec<Vehicle> = self
            .get_all()?
            .into_iter()
            .filter(|v| predicate(v))
            .collect();

        if matched.is_empty() {
            return Err(RepositoryError::NotFoundWithCriteria);
        }
        Ok(matched)
    }
}

impl VehicleRepository for InMemoryVehicleRepository {
    fn get_all(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let db = self.db()?;
        if db.is_empty() {
            return Err(RepositoryError::NotFound);
        }

        Ok(db
            .iter()
            .map(|(id, attributes)| Vehicle::new(*id, attributes.clone()))
            .collect())
    }

    fn get_by_id(&self, id: VehicleId) -> Result<Vehicle, RepositoryError> {
        let db = self.db()?;
        db.get(&id)
            .map(|attributes| Vehicle::new(id, attributes.clone()))
            .ok_or(RepositoryError::NotFound)
    }

    fn add_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, RepositoryError> {
        let mut db = self.db()?;
        if db.contains_key(&vehicle.id) {
            return Err(RepositoryError::AlreadyExists(vehicle.id));
        }

        db.insert(vehicle.id, vehicle.attributes.clone());
        info!("Inserted vehicle {}", vehicle.id);
        Ok(vehicle)
    }

    fn add_vehicles(&self, vehicles: Vec<Vehicle>) -> Result<Vec<Vehicle>, RepositoryError> {
        let mut db = self.db()?;

        // Precheck against the store and within the batch itself
        let mut seen = HashSet::with_capacity(vehicles.len());
        for vehicle in &vehicles {
            if db.contains_key(&vehicle.id) || !seen.insert(vehicle.id) {
                warn!("Batch rejected: vehicle id {} already exists", vehicle.id);
                return Err(RepositoryError::AlreadyExists(vehicle.id));
            }
        }

        for vehicle in &vehicles {
            db.insert(vehicle.id, vehicle.attributes.clone());
        }
        info!("Inserted batch of {} vehicles", vehicles.len());
        Ok(vehicles)
    }

    fn get_by_color_and_year(
        &self,
        color: &str,
        year: i32,
    ) -> Result<Vec<Vehicle>, RepositoryError> {
        debug!("Querying vehicles by color {} and year {}", color, year);
        self.find_where(|v| v.attributes.color == color && v.attributes.year == year)
    }

    fn get_by_brand_and_period(
        &self,
        brand: &str,
        start: i32,
        end: i32,
    ) -> Result<Vec<Vehicle>, RepositoryError> {
        debug!("Querying vehicles by brand {} in [{}, {})", brand, start, end);
        self.find_where(|v| {
            v.attributes.brand == brand && v.attributes.year >= start && v.attributes.year < end
        })
    }

    fn get_speed_average_by_brand(&self, brand: &str) -> Result<f64, RepositoryError> {
        let speeds: Vec<i64> = self
            .get_all()?
            .iter()
            .filter(|v| v.attributes.brand == brand)
            .map(|v| i64::from(v.attributes.max_speed))
            .collect();

        if speeds.is_empty() {
            return Err(RepositoryError::NotFoundWithCriteria);
        }

        let sum: i64 = speeds.iter().sum();
        Ok(sum as f64 / speeds.len() as f64)
    }

    fn get_by_fuel_type(&self, fuel: &str) -> Result<Vec<Vehicle>, RepositoryError> {
        debug!("Querying vehicles by fuel type {}", fuel);
        self.find_where(|v| v.attributes.fuel_type == fuel)
    }

    fn get_by_weight(&self, min: f64, max: f64) -> Result<Vec<Vehicle>, RepositoryError> {
        debug!("Querying vehicles by weight in [{}, {}]", min, max);
        self.find_where(|v| v.attributes.weight >= min && v.attributes.weight <= max)
    }

    fn update_speed(&self, id: VehicleId, max_speed: i32) -> Result<Vehicle, RepositoryError> {
        let mut db = self.db()?;
        let attributes = db.get_mut(&id).ok_or(RepositoryError::NotFound)?;

        // Out-of-range speeds leave the stored record untouched
        if !is_valid_max_speed(max_speed) {
            return Err(RepositoryError::ImpossibleMaxSpeed(max_speed));
        }

        attributes.max_speed = max_speed;
        info!("Updated max speed of vehicle {} to {}", id, max_speed);
        Ok(Vehicle::new(id, attributes.clone()))
    }

    fn delete_vehicle(&self, id: VehicleId) -> Result<Vehicle, RepositoryError> {
        let mut db = self.db()?;
        let attributes = db.remove(&id).ok_or(RepositoryError::NotFound)?;
        info!("Deleted vehicle {}", id);
        Ok(Vehicle::new(id, attributes))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.db()?.len())
    }
}

impl Default for InMemoryVehicleRepository {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn vehicle(id: VehicleId, brand: &str, year: i32, max_speed: i32) -> Vehicle {
        Vehicle::new(
            id,
            VehicleAttributes {
                brand: brand.to_string(),
                model: "Base".to_string(),
                registration: format!("REG-{}", id),
                year,
                color: "red".to_string(),
                max_speed,
                fuel_type: "gasoline".to_string(),
                transmission: "manual".to_string(),
                passengers: 5,
                height: 1.5,
                width: 1.8,
                weight: 1200.0,
            },
        )
    }

    fn with_vehicles(vehicles: Vec<Vehicle>) -> InMemoryVehicleRepository {
        InMemoryVehicleRepository::new(
            vehicles.into_iter().map(|v| (v.id, v.attributes)).collect(),
        )
    }

    #[test]
    fn test_get_all_empty_store() {
        let repo = InMemoryVehicleRepository::default();
        assert_eq!(repo.get_all(), Err(RepositoryError::NotFound));
    }

    #[test]
    fn test_add_and_get_all() {
        let repo = InMemoryVehicleRepository::default();
        let mut original = vehicle(1, "Toyota", 2020, 180);

        repo.add_vehicle(original.clone()).unwrap();
        original.attributes.brand = "Changed".to_string();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], vehicle(1, "Toyota", 2020, 180));
    }

    #[test]
    fn test_add_duplicate_leaves_store_unchanged() {
        let repo = with_vehicles(vec![vehicle(1, "Toyota", 2020, 180)]);

        let result = repo.add_vehicle(vehicle(1, "Ford", 1999, 150));
        assert_eq!(result, Err(RepositoryError::AlreadyExists(1)));
        assert_eq!(repo.count(), Ok(1));
        assert_eq!(repo.get_by_id(1).unwrap().attributes.brand, "Toyota");
    }

    #[test]
    fn test_add_vehicles_is_all_or_nothing() {
        let repo = with_vehicles(vec![vehicle(2, "Toyota", 2020, 180)]);

        let batch = vec![
            vehicle(1, "Ford", 2001, 150),
            vehicle(2, "Ford", 2002, 150),
            vehicle(3, "Ford", 2003, 150),
        ];
        assert_eq!(repo.add_vehicles(batch), Err(RepositoryError::AlreadyExists(2)));
        assert_eq!(repo.count(), Ok(1));
        assert_eq!(repo.get_by_id(1), Err(RepositoryError::NotFound));
    }

    #[test]
    fn test_add_vehicles_rejects_repeated_id_in_batch() {
        let repo = InMemoryVehicleRepository::default();

        let batch = vec![vehicle(5, "Ford", 2001, 150), vehicle(5, "Kia", 2002, 160)];
        assert_eq!(repo.add_vehicles(batch), Err(RepositoryError::AlreadyExists(5)));
        assert_eq!(repo.count(), Ok(0));
    }

    #[test]
    fn test_add_vehicles_keeps_input_order() {
        let repo = InMemoryVehicleRepository::default();

        let batch = vec![
            vehicle(9, "Ford", 2001, 150),
            vehicle(3, "Kia", 2002, 160),
            vehicle(6, "Seat", 2003, 170),
        ];
        let inserted = repo.add_vehicles(batch.clone()).unwrap();
        assert_eq!(inserted, batch);
        assert_eq!(repo.count(), Ok(3));
    }

    #[test]
    fn test_brand_and_period_is_end_exclusive() {
        let repo = with_vehicles(vec![
            vehicle(1, "Ford", 2010, 150),
            vehicle(2, "Ford", 2015, 150),
            vehicle(3, "Ford", 2020, 150),
            vehicle(4, "Kia", 2015, 150),
        ]);

        let mut ids: Vec<_> = repo
            .get_by_brand_and_period("Ford", 2010, 2020)
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(
            repo.get_by_brand_and_period("Ford", 2021, 2030),
            Err(RepositoryError::NotFoundWithCriteria)
        );
    }

    #[test]
    fn test_speed_average() {
        let repo = with_vehicles(vec![
            vehicle(1, "X", 2010, 100),
            vehicle(2, "X", 2011, 200),
            vehicle(3, "Y", 2012, 390),
        ]);

        assert_eq!(repo.get_speed_average_by_brand("X").unwrap(), 150.0);
        assert_eq!(
            repo.get_speed_average_by_brand("Z"),
            Err(RepositoryError::NotFoundWithCriteria)
        );
    }

    #[test]
    fn test_weight_range_is_inclusive() {
        let mut light = vehicle(1, "Fiat", 2010, 140);
        light.attributes.weight = 800.0;
        let mut heavy = vehicle(2, "Volvo", 2010, 180);
        heavy.attributes.weight = 2000.0;
        let mut outside = vehicle(3, "Scania", 2010, 120);
        outside.attributes.weight = 2000.5;
        let repo = with_vehicles(vec![light, heavy, outside]);

        let mut ids: Vec<_> = repo
            .get_by_weight(800.0, 2000.0)
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_fuel_type_filter() {
        let mut diesel = vehicle(1, "Fiat", 2010, 140);
        diesel.attributes.fuel_type = "diesel".to_string();
        let repo = with_vehicles(vec![diesel, vehicle(2, "Fiat", 2011, 150)]);

        let found = repo.get_by_fuel_type("diesel").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
        assert_eq!(
            repo.get_by_fuel_type("electric"),
            Err(RepositoryError::NotFoundWithCriteria)
        );
    }

    #[test]
    fn test_filters_on_empty_store_report_not_found() {
        let repo = InMemoryVehicleRepository::default();
        assert_eq!(repo.get_by_fuel_type("diesel"), Err(RepositoryError::NotFound));
        assert_eq!(repo.get_speed_average_by_brand("X"), Err(RepositoryError::NotFound));
    }

    #[test]
    fn test_update_speed() {
        let repo = with_vehicles(vec![vehicle(1, "Toyota", 2020, 180)]);

        let updated = repo.update_speed(1, 220).unwrap();
        assert_eq!(updated.attributes.max_speed, 220);
        assert_eq!(updated.attributes.brand, "Toyota");
        assert_eq!(repo.get_by_id(1).unwrap().attributes.max_speed, 220);
    }

    #[test]
    fn test_update_speed_out_of_range_does_not_mutate() {
        let repo = with_vehicles(vec![vehicle(1, "Toyota", 2020, 180)]);

        assert_eq!(repo.update_speed(1, 500), Err(RepositoryError::ImpossibleMaxSpeed(500)));
        assert_eq!(repo.update_speed(1, -1), Err(RepositoryError::ImpossibleMaxSpeed(-1)));
        assert_eq!(repo.get_by_id(1).unwrap().attributes.max_speed, 180);
    }

    #[test]
    fn test_update_speed_missing_vehicle() {
        let repo = with_vehicles(vec![vehicle(1, "Toyota", 2020, 180)]);

        assert_eq!(repo.update_speed(2, 100), Err(RepositoryError::NotFound));
        assert_eq!(repo.count(), Ok(1));
        assert_eq!(repo.get_by_id(1).unwrap().attributes.max_speed, 180);
    }

    #[test]
    fn test_delete_then_get_by_id() {
        let repo = with_vehicles(vec![vehicle(1, "Toyota", 2020, 180)]);

        let deleted = repo.delete_vehicle(1).unwrap();
        assert_eq!(deleted, vehicle(1, "Toyota", 2020, 180));
        assert_eq!(repo.get_by_id(1), Err(RepositoryError::NotFound));
        assert_eq!(repo.delete_vehicle(1), Err(RepositoryError::NotFound));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let repo = InMemoryVehicleRepository::default();
        assert_eq!(repo.get_all(), Err(RepositoryError::NotFound));

        let toyota = vehicle(1, "Toyota", 2020, 180);
        repo.add_vehicle(toyota.clone()).unwrap();
        assert_eq!(repo.get_all().unwrap(), vec![toyota.clone()]);

        assert_eq!(repo.update_speed(1, 500), Err(RepositoryError::ImpossibleMaxSpeed(500)));
        assert_eq!(repo.get_all().unwrap(), vec![toyota]);
    }

    #[test]
    fn test_concurrent_inserts_of_same_id() {
        let repo = Arc::new(InMemoryVehicleRepository::default());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || repo.add_vehicle(vehicle(1, "Toyota", 2000 + i, 180)))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let inserted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(inserted, 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| *r == Err(RepositoryError::AlreadyExists(1))));
        assert_eq!(repo.count(), Ok(1));
    }

    #[test]
    fn test_update_speed_racing_delete() {
        for _ in 0..50 {
            let repo = Arc::new(with_vehicles(vec![vehicle(1, "Toyota", 2020, 180)]));

            let updater = {
                let repo = Arc::clone(&repo);
                thread::spawn(move || repo.update_speed(1, 250))
            };
            let deleter = {
                let repo = Arc::clone(&repo);
                thread::spawn(move || repo.delete_vehicle(1))
            };

            let updated = updater.join().unwrap();
            let deleted = deleter.join().unwrap().unwrap();

            // Either the update landed before the delete, or it saw the id gone
            match updated {
                Ok(v) => {
                    assert_eq!(v.attributes.max_speed, 250);
                    assert_eq!(deleted.attributes.max_speed, 250);
                }
                Err(err) => {
                    assert_eq!(err, RepositoryError::NotFound);
                    assert_eq!(deleted.attributes.max_speed, 180);
                }
            }
            assert_eq!(repo.get_by_id(1), Err(RepositoryError::NotFound));
            assert_eq!(repo.count(), Ok(0));
        }
    }

    #[test]
    fn test_poisoned_lock_is_internal_error() {
        let repo = Arc::new(with_vehicles(vec![vehicle(1, "Toyota", 2020, 180)]));

        let poisoner = Arc::clone(&repo);
        let _ = thread::spawn(move || {
            let _guard = poisoner.db.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(repo.count(), Err(RepositoryError::Internal(_))));
        assert!(matches!(repo.get_all(), Err(RepositoryError::Internal(_))));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        const COLORS: [&str; 3] = ["red", "blue", "black"];

        fn fleet() -> impl Strategy<Value = Vec<(String, i32)>> {
            prop::collection::vec(
                (prop::sample::select(COLORS.to_vec()), 2000..2005i32)
                    .prop_map(|(color, year)| (color.to_string(), year)),
                0..40,
            )
        }

        proptest! {
            #[test]
            fn color_and_year_returns_exact_subset(
                entries in fleet(),
                color in prop::sample::select(COLORS.to_vec()),
                year in 2000..2005i32,
            ) {
                let vehicles: Vec<Vehicle> = entries
                    .iter()
                    .enumerate()
                    .map(|(i, (c, y))| {
                        let mut v = vehicle(i as VehicleId, "Brand", *y, 100);
                        v.attributes.color = c.clone();
                        v
                    })
                    .collect();
                let repo = with_vehicles(vehicles.clone());

                let mut expected: Vec<VehicleId> = vehicles
                    .iter()
                    .filter(|v| v.attributes.color == color && v.attributes.year == year)
                    .map(|v| v.id)
                    .collect();
                expected.sort();

                match repo.get_by_color_and_year(color, year) {
                    Ok(found) => {
                        let mut ids: Vec<VehicleId> = found.iter().map(|v| v.id).collect();
                        ids.sort();
                        prop_assert_eq!(ids, expected);
                    }
                    Err(RepositoryError::NotFound) => prop_assert!(vehicles.is_empty()),
                    Err(RepositoryError::NotFoundWithCriteria) => prop_assert!(expected.is_empty()),
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
            }

            #[test]
            fn period_bounds_follow_half_open_range(
                years in prop::collection::vec(1990..2030i32, 1..30),
                start in 1990..2030i32,
                span in 0..20i32,
            ) {
                let end = start + span;
                let repo = with_vehicles(
                    years
                        .iter()
                        .enumerate()
                        .map(|(i, y)| vehicle(i as VehicleId, "Ford", *y, 100))
                        .collect(),
                );

                let expected = years.iter().filter(|y| **y >= start && **y < end).count();
                match repo.get_by_brand_and_period("Ford", start, end) {
                    Ok(found) => {
                        prop_assert_eq!(found.len(), expected);
                        prop_assert!(found.iter().all(|v| v.attributes.year >= start && v.attributes.year < end));
                    }
                    Err(RepositoryError::NotFoundWithCriteria) => prop_assert_eq!(expected, 0),
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
            }
        }
    }
}
