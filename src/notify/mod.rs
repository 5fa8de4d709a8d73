//! Status-change notification.
//!
//! Every vehicle owns a [`Notifier`]. Each status write on the vehicle sends
//! one [`StatusEvent`] to every registered [`StatusObserver`], synchronously
//! and in registration order, before the write call returns.

/// Requester accounts that react to status changes through the permission matrix.
pub mod account;
/// Observer registry and isolated fan-out.
pub mod notifier;

pub use account::{AccountObserver, Reaction};
pub use notifier::{Notifier, NotifyReport, ObserverFailure};

use thiserror::Error;

use crate::fleet::{VehicleId, VehicleStatus};

/// Typed payload delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub vehicle_id: VehicleId,
    pub license_plate: String,
    pub previous: VehicleStatus,
    pub status: VehicleStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ObserverError {
    pub message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Receiver of vehicle status changes.
///
/// Callbacks may read the vehicle that emitted the event but must not
/// change its status: the triggering write holds the vehicle's publishing
/// lock until every observer has returned, so a nested write never finishes.
pub trait StatusObserver: Send + Sync {
    /// Label used when reporting a failed delivery.
    fn name(&self) -> &str;

    fn on_status_changed(&self, event: &StatusEvent) -> Result<(), ObserverError>;
}
