//! Vehicle builders shared by unit tests.

use std::sync::Arc;

use crate::fleet::{EngineType, Vehicle, VehicleProfile, VehicleStatus};

pub(crate) struct Fixture {
    pub plate: &'static str,
    pub engine: EngineType,
    pub fuel: f64,
    pub mileage: f64,
    pub speed: f64,
    pub status: VehicleStatus,
}

impl Fixture {
    pub fn new(plate: &'static str) -> Self {
        Self {
            plate,
            engine: EngineType::Diesel,
            fuel: 50.0,
            mileage: 10_000.0,
            speed: 120.0,
            status: VehicleStatus::Available,
        }
    }

    pub fn engine(mut self, engine: EngineType) -> Self {
        self.engine = engine;
        self
    }

    pub fn fuel(mut self, fuel: f64) -> Self {
        self.fuel = fuel;
        self
    }

    pub fn mileage(mut self, mileage: f64) -> Self {
        self.mileage = mileage;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn status(mut self, status: VehicleStatus) -> Self {
        self.status = status;
        self
    }

    fn profile(&self) -> VehicleProfile {
        VehicleProfile {
            license_plate: self.plate.into(),
            model: format!("model-{}", self.plate),
            fuel_level: self.fuel,
            mileage: self.mileage,
            max_speed: self.speed,
            engine_type: self.engine,
        }
    }

    pub fn car(self, passengers: u32, comfort: u8) -> Arc<Vehicle> {
        Arc::new(
            Vehicle::car(self.profile(), passengers, comfort)
                .unwrap()
                .with_status(self.status),
        )
    }

    pub fn truck(self, cargo: f64, reefer: bool) -> Arc<Vehicle> {
        Arc::new(
            Vehicle::truck(self.profile(), cargo, reefer)
                .unwrap()
                .with_status(self.status),
        )
    }
}

pub(crate) fn plate(vehicle: Option<Arc<Vehicle>>) -> Option<String> {
    vehicle.map(|v| v.license_plate().to_string())
}
