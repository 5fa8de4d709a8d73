use std::collections::HashMap;
use std::sync::Arc;

use super::record::VehicleRecord;
use super::vehicle::{Vehicle, VehicleId};
use crate::error::ValidationError;

/// The set of vehicles known to the allocator, unique by license plate.
#[derive(Debug, Default)]
pub struct Fleet {
    vehicles: Vec<Arc<Vehicle>>,
    by_plate: HashMap<String, usize>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fleet from boundary records, failing on the first invalid one.
    pub fn from_records(
        records: impl IntoIterator<Item = VehicleRecord>,
    ) -> Result<Self, ValidationError> {
        let mut fleet = Self::new();
        for record in records {
            fleet.register(Vehicle::try_from(record)?)?;
        }
        Ok(fleet)
    }

    /// Add a vehicle. Rejects a license plate that is already registered.
    pub fn register(&mut self, vehicle: Vehicle) -> Result<Arc<Vehicle>, ValidationError> {
        let plate = vehicle.license_plate().to_string();
        if self.by_plate.contains_key(&plate) {
            return Err(ValidationError::DuplicateLicensePlate(plate));
        }
        let vehicle = Arc::new(vehicle);
        self.by_plate.insert(plate, self.vehicles.len());
        self.vehicles.push(Arc::clone(&vehicle));
        Ok(vehicle)
    }

    pub fn get(&self, id: VehicleId) -> Option<&Arc<Vehicle>> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    pub fn by_plate(&self, plate: &str) -> Option<&Arc<Vehicle>> {
        self.by_plate.get(plate).map(|&idx| &self.vehicles[idx])
    }

    /// All vehicles in registration order; this is the candidate list.
    pub fn vehicles(&self) -> &[Arc<Vehicle>] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
