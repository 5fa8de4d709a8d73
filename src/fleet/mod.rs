//! Vehicle model: status and engine enums, the car/truck variant type,
//! boundary records, and the fleet registry.

pub mod record;
pub mod registry;
pub mod status;
pub mod vehicle;

pub use record::{KindRecord, VehicleRecord, VehicleSnapshot};
pub use registry::Fleet;
pub use status::{EngineType, VehicleStatus};
pub use vehicle::{
    CarDetails, ComfortLevel, StatusChange, TruckDetails, Vehicle, VehicleId, VehicleKind,
    VehicleProfile,
};
