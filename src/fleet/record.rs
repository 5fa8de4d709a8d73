//! Serde shapes for vehicles crossing the crate boundary.

use serde::{Deserialize, Serialize};

use super::status::{EngineType, VehicleStatus};
use super::vehicle::{CarDetails, TruckDetails, Vehicle, VehicleId, VehicleKind, VehicleProfile};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KindRecord {
    Car {
        passenger_capacity: u32,
        comfort_level: u8,
    },
    Truck {
        cargo_capacity: f64,
        #[serde(default)]
        has_refrigeration_unit: bool,
    },
}

impl From<&VehicleKind> for KindRecord {
    fn from(kind: &VehicleKind) -> Self {
        match kind {
            VehicleKind::Car(car) => KindRecord::Car {
                passenger_capacity: car.passenger_capacity(),
                comfort_level: car.comfort_level().get(),
            },
            VehicleKind::Truck(truck) => KindRecord::Truck {
                cargo_capacity: truck.cargo_capacity(),
                has_refrigeration_unit: truck.has_refrigeration_unit(),
            },
        }
    }
}

impl TryFrom<KindRecord> for VehicleKind {
    type Error = ValidationError;

    fn try_from(record: KindRecord) -> Result<Self, Self::Error> {
        Ok(match record {
            KindRecord::Car {
                passenger_capacity,
                comfort_level,
            } => VehicleKind::Car(CarDetails::new(passenger_capacity, comfort_level)?),
            KindRecord::Truck {
                cargo_capacity,
                has_refrigeration_unit,
            } => VehicleKind::Truck(TruckDetails::new(cargo_capacity, has_refrigeration_unit)?),
        })
    }
}

/// A vehicle as supplied by a persistence or request collaborator.
///
/// `status` restores a persisted state and defaults to AVAILABLE.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleRecord {
    pub license_plate: String,
    pub model: String,
    pub fuel_level: f64,
    #[serde(default)]
    pub mileage: f64,
    pub max_speed: f64,
    pub engine_type: EngineType,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
    #[serde(flatten)]
    pub kind: KindRecord,
}

impl TryFrom<VehicleRecord> for Vehicle {
    type Error = ValidationError;

    fn try_from(record: VehicleRecord) -> Result<Self, Self::Error> {
        let profile = VehicleProfile {
            license_plate: record.license_plate,
            model: record.model,
            fuel_level: record.fuel_level,
            mileage: record.mileage,
            max_speed: record.max_speed,
            engine_type: record.engine_type,
        };
        let vehicle = Vehicle::new(profile, record.kind.try_into()?)?;
        Ok(match record.status {
            Some(status) => vehicle.with_status(status),
            None => vehicle,
        })
    }
}

/// Point-in-time view of a vehicle, for rendering and audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub license_plate: String,
    pub model: String,
    pub fuel_level: f64,
    pub mileage: f64,
    pub max_speed: f64,
    pub engine_type: EngineType,
    pub status: VehicleStatus,
    #[serde(flatten)]
    pub kind: KindRecord,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id(),
            license_plate: vehicle.license_plate().to_string(),
            model: vehicle.model().to_string(),
            fuel_level: vehicle.fuel_level(),
            mileage: vehicle.mileage(),
            max_speed: vehicle.max_speed(),
            engine_type: vehicle.engine_type(),
            status: vehicle.status(),
            kind: vehicle.kind().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truck_record_parses() {
        let record: VehicleRecord = serde_json::from_str(
            r#"{
                "kind": "truck",
                "license_plate": "TR-100",
                "model": "Actros",
                "fuel_level": 50,
                "max_speed": 120,
                "engine_type": "DIESEL",
                "cargo_capacity": 800,
                "has_refrigeration_unit": true
            }"#,
        )
        .unwrap();
        let vehicle = Vehicle::try_from(record).unwrap();
        assert_eq!(vehicle.status(), VehicleStatus::Available);
        assert_eq!(vehicle.mileage(), 0.0);
        let truck = vehicle.as_truck().unwrap();
        assert_eq!(truck.cargo_capacity(), 800.0);
        assert!(truck.has_refrigeration_unit());
    }

    #[test]
    fn car_record_with_status() {
        let record: VehicleRecord = serde_json::from_str(
            r#"{
                "kind": "car",
                "license_plate": "CA-1",
                "model": "Golf",
                "fuel_level": 30,
                "mileage": 12000,
                "max_speed": 190,
                "engine_type": "PETROL",
                "status": "RESERVED",
                "passenger_capacity": 5,
                "comfort_level": 6
            }"#,
        )
        .unwrap();
        let vehicle = Vehicle::try_from(record).unwrap();
        assert_eq!(vehicle.status(), VehicleStatus::Reserved);
    }

    #[test]
    fn invalid_comfort_in_record_rejected() {
        let record: VehicleRecord = serde_json::from_str(
            r#"{
                "kind": "car",
                "license_plate": "CA-2",
                "model": "Golf",
                "fuel_level": 30,
                "max_speed": 190,
                "engine_type": "PETROL",
                "passenger_capacity": 5,
                "comfort_level": 12
            }"#,
        )
        .unwrap();
        assert_eq!(
            Vehicle::try_from(record).unwrap_err(),
            ValidationError::ComfortLevelOutOfRange(12)
        );
    }

    #[test]
    fn snapshot_flattens_kind() {
        let vehicle = Vehicle::truck(
            VehicleProfile {
                license_plate: "TR-101".into(),
                model: "FH".into(),
                fuel_level: 20.0,
                mileage: 5.0,
                max_speed: 110.0,
                engine_type: EngineType::Diesel,
            },
            300.0,
            false,
        )
        .unwrap();
        let json = serde_json::to_value(VehicleSnapshot::from(&vehicle)).unwrap();
        assert_eq!(json["kind"], "truck");
        assert_eq!(json["cargo_capacity"], 300.0);
        assert_eq!(json["status"], "AVAILABLE");
    }
}
