use super::Specification;
use crate::fleet::{EngineType, Vehicle, VehicleKind, VehicleStatus};

/// AVAILABLE and carrying at least `min_fuel_level` fuel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationalReadiness {
    pub min_fuel_level: f64,
}

impl OperationalReadiness {
    pub fn new(min_fuel_level: f64) -> Self {
        Self { min_fuel_level }
    }
}

impl Specification for OperationalReadiness {
    type Candidate = Vehicle;

    fn is_satisfied_by(&self, vehicle: &Vehicle) -> bool {
        vehicle.status() == VehicleStatus::Available && vehicle.fuel_level() >= self.min_fuel_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasEngineType(pub EngineType);

impl Specification for HasEngineType {
    type Candidate = Vehicle;

    fn is_satisfied_by(&self, vehicle: &Vehicle) -> bool {
        vehicle.engine_type() == self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasStatus(pub VehicleStatus);

impl Specification for HasStatus {
    type Candidate = Vehicle;

    fn is_satisfied_by(&self, vehicle: &Vehicle) -> bool {
        vehicle.status() == self.0
    }
}

/// Trucks able to carry at least the given load. Never satisfied by cars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinCargoCapacity(pub f64);

impl Specification for MinCargoCapacity {
    type Candidate = Vehicle;

    fn is_satisfied_by(&self, vehicle: &Vehicle) -> bool {
        match vehicle.kind() {
            VehicleKind::Truck(truck) => truck.cargo_capacity() >= self.0,
            VehicleKind::Car(_) => false,
        }
    }
}

/// Cars seating at least the given number of passengers. Never satisfied by trucks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinPassengerCapacity(pub u32);

impl Specification for MinPassengerCapacity {
    type Candidate = Vehicle;

    fn is_satisfied_by(&self, vehicle: &Vehicle) -> bool {
        match vehicle.kind() {
            VehicleKind::Car(car) => car.passenger_capacity() >= self.0,
            VehicleKind::Truck(_) => false,
        }
    }
}

/// Trucks whose refrigeration unit presence equals the requested flag.
/// Never satisfied by cars, whichever flag is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refrigeration(pub bool);

impl Specification for Refrigeration {
    type Candidate = Vehicle;

    fn is_satisfied_by(&self, vehicle: &Vehicle) -> bool {
        match vehicle.kind() {
            VehicleKind::Truck(truck) => truck.has_refrigeration_unit() == self.0,
            VehicleKind::Car(_) => false,
        }
    }
}

/// Engine-scoped efficiency: the preferred engine, not worn past
/// `max_mileage`, and rated for at least `min_max_speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelEfficiency {
    pub engine_type: EngineType,
    pub max_mileage: f64,
    pub min_max_speed: f64,
}

impl Specification for FuelEfficiency {
    type Candidate = Vehicle;

    fn is_satisfied_by(&self, vehicle: &Vehicle) -> bool {
        vehicle.engine_type() == self.engine_type
            && vehicle.mileage() <= self.max_mileage
            && vehicle.max_speed() >= self.min_max_speed
    }
}

/// Engine match plus a capacity floor that depends on the variant:
/// passengers for cars, cargo for trucks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Versatile {
    pub engine_type: EngineType,
    pub min_passenger_capacity: u32,
    pub min_cargo_capacity: f64,
}

impl Specification for Versatile {
    type Candidate = Vehicle;

    fn is_satisfied_by(&self, vehicle: &Vehicle) -> bool {
        if vehicle.engine_type() != self.engine_type {
            return false;
        }
        match vehicle.kind() {
            VehicleKind::Car(car) => car.passenger_capacity() >= self.min_passenger_capacity,
            VehicleKind::Truck(truck) => truck.cargo_capacity() >= self.min_cargo_capacity,
        }
    }
}
