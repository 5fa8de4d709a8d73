use std::sync::Arc;

use crate::fleet::{Vehicle, VehicleStatus};
use crate::notify::NotifyReport;
use crate::permission::PermissionCheck;

/// Result of an allocation request. Every variant is an expected outcome
/// the caller has to branch on.
#[derive(Debug)]
#[must_use]
pub enum Allocation {
    /// The vehicle is now IN_USE and its observers have been notified.
    Allocated {
        vehicle: Arc<Vehicle>,
        report: NotifyReport,
    },
    /// No candidate passed the filter and the strategy.
    NoEligibleVehicle,
    /// A vehicle was eligible but the requester's role may not take it.
    Denied(PermissionCheck),
    /// Every attempt lost a race for the selected vehicle.
    Contended { attempts: usize },
}

impl Allocation {
    pub fn vehicle(&self) -> Option<&Arc<Vehicle>> {
        match self {
            Allocation::Allocated { vehicle, .. } => Some(vehicle),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Allocation::Allocated { .. } => "allocated",
            Allocation::NoEligibleVehicle => "no_eligible_vehicle",
            Allocation::Denied(_) => "denied",
            Allocation::Contended { .. } => "contended",
        }
    }
}

/// Result of a gated status transition on one vehicle.
#[derive(Debug)]
#[must_use]
pub enum TransitionOutcome {
    Applied {
        previous: VehicleStatus,
        status: VehicleStatus,
        report: NotifyReport,
    },
    Denied(PermissionCheck),
    /// The status changed between the permission check and the write.
    Conflict { actual: VehicleStatus },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }
}
