use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::status::{EngineType, VehicleStatus};
use crate::error::ValidationError;
use crate::notify::{Notifier, NotifyReport, StatusEvent, StatusObserver};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique vehicle identifier, assigned at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(u64);

impl VehicleId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Passenger comfort rating, always within 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ComfortLevel(u8);

impl ComfortLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(level: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ValidationError::ComfortLevelOutOfRange(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ComfortLevel {
    type Error = ValidationError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarDetails {
    passenger_capacity: u32,
    comfort_level: ComfortLevel,
}

impl CarDetails {
    pub fn new(passenger_capacity: u32, comfort_level: u8) -> Result<Self, ValidationError> {
        if passenger_capacity == 0 {
            return Err(ValidationError::ZeroPassengerCapacity);
        }
        Ok(Self {
            passenger_capacity,
            comfort_level: ComfortLevel::new(comfort_level)?,
        })
    }

    pub fn passenger_capacity(&self) -> u32 {
        self.passenger_capacity
    }

    pub fn comfort_level(&self) -> ComfortLevel {
        self.comfort_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruckDetails {
    cargo_capacity: f64,
    has_refrigeration_unit: bool,
}

impl TruckDetails {
    pub fn new(cargo_capacity: f64, has_refrigeration_unit: bool) -> Result<Self, ValidationError> {
        if !cargo_capacity.is_finite() || cargo_capacity < 0.0 {
            return Err(ValidationError::InvalidCargoCapacity(cargo_capacity));
        }
        Ok(Self {
            cargo_capacity,
            has_refrigeration_unit,
        })
    }

    pub fn cargo_capacity(&self) -> f64 {
        self.cargo_capacity
    }

    pub fn has_refrigeration_unit(&self) -> bool {
        self.has_refrigeration_unit
    }
}

/// Variant-specific payload. Strategies and specifications match on this
/// instead of probing the vehicle's concrete type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleKind {
    Car(CarDetails),
    Truck(TruckDetails),
}

/// Attributes shared by every vehicle variant, as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleProfile {
    pub license_plate: String,
    pub model: String,
    pub fuel_level: f64,
    pub mileage: f64,
    pub max_speed: f64,
    pub engine_type: EngineType,
}

impl VehicleProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.license_plate.trim().is_empty() {
            return Err(ValidationError::EmptyLicensePlate);
        }
        if !self.fuel_level.is_finite() || self.fuel_level < 0.0 {
            return Err(ValidationError::InvalidFuelLevel(self.fuel_level));
        }
        if !self.mileage.is_finite() || self.mileage < 0.0 {
            return Err(ValidationError::InvalidMileage(self.mileage));
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(ValidationError::InvalidMaxSpeed(self.max_speed));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct VehicleState {
    status: VehicleStatus,
    fuel_level: f64,
    mileage: f64,
}

/// Result of a compare-and-set on a vehicle's status.
#[derive(Debug)]
#[must_use]
pub enum StatusChange {
    /// The status was switched and every observer has been called.
    Applied {
        previous: VehicleStatus,
        report: NotifyReport,
    },
    /// The vehicle was not in the expected status; nothing changed.
    Conflict { actual: VehicleStatus },
}

impl StatusChange {
    pub fn is_applied(&self) -> bool {
        matches!(self, StatusChange::Applied { .. })
    }
}

/// A fleet vehicle.
///
/// Identity and physical attributes are fixed at construction. Status, fuel
/// level and mileage sit behind a per-vehicle lock, and every status write
/// funnels through [`Vehicle::set_status`], [`Vehicle::compare_and_set_status`]
/// or [`Vehicle::release`], each of which notifies the registered observers
/// once before returning.
///
/// Writes are serialized from commit through fan-out, so observers see the
/// events of one vehicle in commit order and the last event an observer
/// received always carries the current status.
pub struct Vehicle {
    id: VehicleId,
    license_plate: String,
    model: String,
    max_speed: f64,
    engine_type: EngineType,
    kind: VehicleKind,
    state: Mutex<VehicleState>,
    /// Held by a status write across its commit and its notification.
    publishing: Mutex<()>,
    notifier: Notifier,
}

impl Vehicle {
    /// Create a vehicle in status AVAILABLE.
    pub fn new(profile: VehicleProfile, kind: VehicleKind) -> Result<Self, ValidationError> {
        profile.validate()?;
        Ok(Self {
            id: VehicleId::next(),
            license_plate: profile.license_plate,
            model: profile.model,
            max_speed: profile.max_speed,
            engine_type: profile.engine_type,
            kind,
            state: Mutex::new(VehicleState {
                status: VehicleStatus::Available,
                fuel_level: profile.fuel_level,
                mileage: profile.mileage,
            }),
            publishing: Mutex::new(()),
            notifier: Notifier::default(),
        })
    }

    pub fn car(
        profile: VehicleProfile,
        passenger_capacity: u32,
        comfort_level: u8,
    ) -> Result<Self, ValidationError> {
        let details = CarDetails::new(passenger_capacity, comfort_level)?;
        Self::new(profile, VehicleKind::Car(details))
    }

    pub fn truck(
        profile: VehicleProfile,
        cargo_capacity: f64,
        has_refrigeration_unit: bool,
    ) -> Result<Self, ValidationError> {
        let details = TruckDetails::new(cargo_capacity, has_refrigeration_unit)?;
        Self::new(profile, VehicleKind::Truck(details))
    }

    /// Restore a persisted status before the vehicle is shared.
    ///
    /// Takes `self` by value, so no observer can be attached yet and no
    /// notification is owed.
    pub fn with_status(self, status: VehicleStatus) -> Self {
        self.lock_state().status = status;
        self
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn license_plate(&self) -> &str {
        &self.license_plate
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn engine_type(&self) -> EngineType {
        self.engine_type
    }

    pub fn kind(&self) -> &VehicleKind {
        &self.kind
    }

    pub fn as_car(&self) -> Option<&CarDetails> {
        match &self.kind {
            VehicleKind::Car(car) => Some(car),
            VehicleKind::Truck(_) => None,
        }
    }

    pub fn as_truck(&self) -> Option<&TruckDetails> {
        match &self.kind {
            VehicleKind::Truck(truck) => Some(truck),
            VehicleKind::Car(_) => None,
        }
    }

    pub fn status(&self) -> VehicleStatus {
        self.lock_state().status
    }

    pub fn fuel_level(&self) -> f64 {
        self.lock_state().fuel_level
    }

    pub fn mileage(&self) -> f64 {
        self.lock_state().mileage
    }

    pub fn refuel(&self, fuel_level: f64) -> Result<(), ValidationError> {
        if !fuel_level.is_finite() || fuel_level < 0.0 {
            return Err(ValidationError::InvalidFuelLevel(fuel_level));
        }
        self.lock_state().fuel_level = fuel_level;
        Ok(())
    }

    pub fn add_observer(&self, observer: Arc<dyn StatusObserver>) {
        self.notifier.add_observer(observer);
    }

    /// Detach an observer by identity. Returns `false` if it was not attached.
    pub fn remove_observer<O: StatusObserver + ?Sized>(&self, observer: &Arc<O>) -> bool {
        self.notifier.remove_observer(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.notifier.len()
    }

    /// Unconditionally set the status and notify. Notifies even when the
    /// status does not change.
    pub fn set_status(&self, status: VehicleStatus) -> NotifyReport {
        let _publishing = self.lock_publishing();
        let previous = {
            let mut state = self.lock_state();
            std::mem::replace(&mut state.status, status)
        };
        self.publish(previous, status)
    }

    /// Switch to `next` only if the current status is `expected`.
    ///
    /// The check and the write happen under the vehicle lock, so of several
    /// callers racing from the same `expected` status exactly one wins.
    pub fn compare_and_set_status(
        &self,
        expected: VehicleStatus,
        next: VehicleStatus,
    ) -> StatusChange {
        let _publishing = self.lock_publishing();
        {
            let mut state = self.lock_state();
            if state.status != expected {
                return StatusChange::Conflict {
                    actual: state.status,
                };
            }
            state.status = next;
        }
        StatusChange::Applied {
            previous: expected,
            report: self.publish(expected, next),
        }
    }

    /// Return the vehicle to AVAILABLE with an updated odometer reading.
    ///
    /// The reading must not be lower than the current mileage; on rejection
    /// neither the mileage nor the status changes.
    pub fn release(&self, mileage: f64) -> Result<(VehicleStatus, NotifyReport), ValidationError> {
        let _publishing = self.lock_publishing();
        let previous = {
            let mut state = self.lock_state();
            if !mileage.is_finite() {
                return Err(ValidationError::InvalidMileage(mileage));
            }
            if mileage < state.mileage {
                return Err(ValidationError::MileageRegression {
                    current: state.mileage,
                    requested: mileage,
                });
            }
            state.mileage = mileage;
            std::mem::replace(&mut state.status, VehicleStatus::Available)
        };
        Ok((previous, self.publish(previous, VehicleStatus::Available)))
    }

    // Called with the state lock released so observers may read the vehicle,
    // and with the publishing lock held so events leave in commit order.
    fn publish(&self, previous: VehicleStatus, status: VehicleStatus) -> NotifyReport {
        let event = StatusEvent {
            vehicle_id: self.id,
            license_plate: self.license_plate.clone(),
            previous,
            status,
        };
        self.notifier.notify(&event)
    }

    fn lock_state(&self) -> MutexGuard<'_, VehicleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_publishing(&self) -> MutexGuard<'_, ()> {
        self.publishing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("Vehicle")
            .field("id", &self.id)
            .field("license_plate", &self.license_plate)
            .field("model", &self.model)
            .field("engine_type", &self.engine_type)
            .field("max_speed", &self.max_speed)
            .field("kind", &self.kind)
            .field("status", &state.status)
            .field("fuel_level", &state.fuel_level)
            .field("mileage", &state.mileage)
            .field("observers", &self.notifier.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ObserverError;

    fn profile(plate: &str) -> VehicleProfile {
        VehicleProfile {
            license_plate: plate.into(),
            model: "Test".into(),
            fuel_level: 40.0,
            mileage: 1000.0,
            max_speed: 160.0,
            engine_type: EngineType::Diesel,
        }
    }

    #[test]
    fn new_vehicle_is_available() {
        let v = Vehicle::car(profile("AB-1"), 4, 7).unwrap();
        assert_eq!(v.status(), VehicleStatus::Available);
        assert_eq!(v.as_car().unwrap().comfort_level().get(), 7);
        assert!(v.as_truck().is_none());
    }

    #[test]
    fn ids_are_unique() {
        let a = Vehicle::car(profile("AB-2"), 4, 5).unwrap();
        let b = Vehicle::car(profile("AB-3"), 4, 5).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn comfort_level_bounds() {
        assert!(ComfortLevel::new(1).is_ok());
        assert!(ComfortLevel::new(10).is_ok());
        assert_eq!(
            ComfortLevel::new(0),
            Err(ValidationError::ComfortLevelOutOfRange(0))
        );
        assert_eq!(
            Vehicle::car(profile("AB-4"), 4, 11).unwrap_err(),
            ValidationError::ComfortLevelOutOfRange(11)
        );
    }

    #[test]
    fn zero_passengers_rejected() {
        assert_eq!(
            CarDetails::new(0, 5).unwrap_err(),
            ValidationError::ZeroPassengerCapacity
        );
    }

    #[test]
    fn negative_cargo_rejected() {
        assert!(matches!(
            Vehicle::truck(profile("TR-1"), -1.0, false),
            Err(ValidationError::InvalidCargoCapacity(_))
        ));
        assert!(Vehicle::truck(profile("TR-2"), 0.0, false).is_ok());
    }

    #[test]
    fn profile_validation() {
        let mut p = profile("  ");
        assert_eq!(
            Vehicle::car(p.clone(), 4, 5).unwrap_err(),
            ValidationError::EmptyLicensePlate
        );
        p.license_plate = "OK-1".into();
        p.fuel_level = -1.0;
        assert!(matches!(
            Vehicle::car(p.clone(), 4, 5),
            Err(ValidationError::InvalidFuelLevel(_))
        ));
        p.fuel_level = 1.0;
        p.max_speed = 0.0;
        assert!(matches!(
            Vehicle::car(p, 4, 5),
            Err(ValidationError::InvalidMaxSpeed(_))
        ));
    }

    #[test]
    fn compare_and_set_conflict_leaves_status() {
        let v = Vehicle::truck(profile("TR-3"), 100.0, true).unwrap();
        v.set_status(VehicleStatus::Reserved);
        let change = v.compare_and_set_status(VehicleStatus::Available, VehicleStatus::InUse);
        assert!(matches!(
            change,
            StatusChange::Conflict {
                actual: VehicleStatus::Reserved
            }
        ));
        assert_eq!(v.status(), VehicleStatus::Reserved);
    }

    #[test]
    fn compare_and_set_applies() {
        let v = Vehicle::truck(profile("TR-4"), 100.0, true).unwrap();
        let change = v.compare_and_set_status(VehicleStatus::Available, VehicleStatus::InUse);
        assert!(change.is_applied());
        assert_eq!(v.status(), VehicleStatus::InUse);
    }

    #[test]
    fn release_rejects_lower_mileage() {
        let v = Vehicle::car(profile("AB-5"), 4, 5).unwrap();
        v.set_status(VehicleStatus::InUse);
        let err = v.release(999.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MileageRegression {
                current: 1000.0,
                requested: 999.0
            }
        );
        assert_eq!(v.status(), VehicleStatus::InUse);
        assert_eq!(v.mileage(), 1000.0);
    }

    #[test]
    fn release_updates_mileage_and_status() {
        let v = Vehicle::car(profile("AB-6"), 4, 5).unwrap();
        v.set_status(VehicleStatus::InUse);
        let (previous, _) = v.release(1250.5).unwrap();
        assert_eq!(previous, VehicleStatus::InUse);
        assert_eq!(v.status(), VehicleStatus::Available);
        assert_eq!(v.mileage(), 1250.5);
        // Same reading again is allowed.
        assert!(v.release(1250.5).is_ok());
    }

    #[test]
    fn refuel_validates() {
        let v = Vehicle::car(profile("AB-8"), 4, 5).unwrap();
        v.refuel(75.5).unwrap();
        assert_eq!(v.fuel_level(), 75.5);
        assert_eq!(
            v.refuel(-3.0).unwrap_err(),
            ValidationError::InvalidFuelLevel(-3.0)
        );
        assert!(v.refuel(f64::NAN).is_err());
        assert_eq!(v.fuel_level(), 75.5);
    }

    struct Failing;

    impl StatusObserver for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn on_status_changed(&self, _: &StatusEvent) -> Result<(), ObserverError> {
            Err(ObserverError::new("mailbox full"))
        }
    }

    struct Exploding;

    impl StatusObserver for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn on_status_changed(&self, _: &StatusEvent) -> Result<(), ObserverError> {
            panic!("observer bug");
        }
    }

    /// Records the vehicle's status as read from inside the callback.
    struct Reader {
        vehicle: Mutex<Option<Arc<Vehicle>>>,
        seen: Mutex<Vec<VehicleStatus>>,
    }

    impl StatusObserver for Reader {
        fn name(&self) -> &str {
            "reader"
        }

        fn on_status_changed(&self, event: &StatusEvent) -> Result<(), ObserverError> {
            let vehicle = self.vehicle.lock().unwrap();
            let status = vehicle.as_ref().map_or(event.status, |v| v.status());
            self.seen.lock().unwrap().push(status);
            Ok(())
        }
    }

    #[test]
    fn failing_observers_do_not_block_the_write() {
        let v = Arc::new(Vehicle::car(profile("AB-9"), 4, 5).unwrap());
        let reader = Arc::new(Reader {
            vehicle: Mutex::new(Some(Arc::clone(&v))),
            seen: Mutex::new(Vec::new()),
        });
        v.add_observer(Arc::new(Failing));
        v.add_observer(Arc::new(Exploding));
        v.add_observer(Arc::clone(&reader) as Arc<dyn StatusObserver>);

        let report = v.set_status(VehicleStatus::InMaintenance);
        assert_eq!(report.invoked, 3);
        let failed: Vec<(&str, bool)> = report
            .failures
            .iter()
            .map(|f| (f.observer.as_str(), f.panicked))
            .collect();
        assert_eq!(failed, [("failing", false), ("exploding", true)]);
        assert_eq!(v.status(), VehicleStatus::InMaintenance);
        // The last observer still ran and could read the committed status.
        assert_eq!(*reader.seen.lock().unwrap(), [VehicleStatus::InMaintenance]);

        // A panic during delivery leaves the vehicle writable.
        let change = v.compare_and_set_status(VehicleStatus::InMaintenance, VehicleStatus::Available);
        assert!(change.is_applied());
        *reader.vehicle.lock().unwrap() = None;
    }

    #[test]
    fn with_status_restores() {
        let v = Vehicle::car(profile("AB-7"), 2, 3)
            .unwrap()
            .with_status(VehicleStatus::InMaintenance);
        assert_eq!(v.status(), VehicleStatus::InMaintenance);
    }
}
