//! Allocation orchestration: readiness filter, strategy, permission check and
//! the status transition, in that order.

mod context;
mod outcome;

use std::sync::Arc;

use log::{debug, info, warn};

pub use context::{AllocationCriteria, RequestContext};
pub use outcome::{Allocation, TransitionOutcome};

use crate::config::Config;
use crate::error::ValidationError;
use crate::fleet::{StatusChange, Vehicle, VehicleStatus};
use crate::permission::{Action, PermissionMatrix};
use crate::specification::{
    BoxedSpecification, HasEngineType, OperationalReadiness, Specification,
};
use crate::strategy::AllocationStrategy;

/// Ties the permission matrix and configuration to the allocation and
/// status-transition operations. Holds no per-request state and can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Allocator {
    config: Config,
    permissions: Arc<PermissionMatrix>,
}

impl Allocator {
    pub fn new(config: Config, permissions: Arc<PermissionMatrix>) -> Self {
        Self {
            config,
            permissions,
        }
    }

    /// Build the permission matrix from the same configuration.
    pub fn from_config(config: Config) -> Self {
        let permissions = Arc::new(PermissionMatrix::from_config(&config));
        Self::new(config, permissions)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn permissions(&self) -> &Arc<PermissionMatrix> {
        &self.permissions
    }

    /// Readiness filter for `criteria`, narrowed to an engine type if one is
    /// requested.
    pub fn filter_for(&self, criteria: &AllocationCriteria) -> BoxedSpecification<Vehicle> {
        let min_fuel_level = criteria
            .min_fuel_level
            .unwrap_or(self.config.settings.default_min_fuel_level);
        let readiness = OperationalReadiness::new(min_fuel_level);
        match criteria.engine_type {
            Some(engine_type) => readiness.and(HasEngineType(engine_type)).boxed(),
            None => readiness.boxed(),
        }
    }

    /// Filter `candidates` with `filter`, then let `strategy` pick among the
    /// survivors. Does not touch any vehicle state.
    pub fn select_matching(
        &self,
        candidates: &[Arc<Vehicle>],
        filter: &dyn Specification<Candidate = Vehicle>,
        strategy: &dyn AllocationStrategy,
    ) -> Option<Arc<Vehicle>> {
        let eligible: Vec<Arc<Vehicle>> = candidates
            .iter()
            .filter(|v| filter.is_satisfied_by(v))
            .cloned()
            .collect();
        debug!(
            "{}: {} of {} candidates eligible",
            strategy.name(),
            eligible.len(),
            candidates.len()
        );
        strategy.allocate(&eligible)
    }

    /// Pure selection: the vehicle `criteria` would allocate right now.
    pub fn select(
        &self,
        candidates: &[Arc<Vehicle>],
        criteria: &AllocationCriteria,
    ) -> Option<Arc<Vehicle>> {
        let filter = self.filter_for(criteria);
        let strategy = criteria.strategy.build(&self.config);
        self.select_matching(candidates, &*filter, strategy.as_ref())
    }

    /// Select a vehicle and move it from AVAILABLE to IN_USE.
    ///
    /// The requester's role needs RESERVE on AVAILABLE vehicles. When another
    /// caller takes the selected vehicle first, it is dropped from the pool
    /// and selection runs again, up to `settings.max_allocation_attempts`.
    pub fn allocate(
        &self,
        ctx: &RequestContext,
        candidates: &[Arc<Vehicle>],
        criteria: &AllocationCriteria,
    ) -> Allocation {
        let filter = self.filter_for(criteria);
        let strategy = criteria.strategy.build(&self.config);
        self.allocate_matching(ctx, candidates, &*filter, strategy.as_ref())
    }

    /// [`allocate`](Self::allocate) with a caller-supplied filter and strategy.
    pub fn allocate_matching(
        &self,
        ctx: &RequestContext,
        candidates: &[Arc<Vehicle>],
        filter: &dyn Specification<Candidate = Vehicle>,
        strategy: &dyn AllocationStrategy,
    ) -> Allocation {
        let attempts = self.config.settings.max_allocation_attempts.max(1);
        let mut pool = candidates.to_vec();

        for attempt in 1..=attempts {
            let Some(vehicle) = self.select_matching(&pool, filter, strategy) else {
                debug!("{ctx}: no eligible vehicle for {}", strategy.name());
                return Allocation::NoEligibleVehicle;
            };

            let check = self
                .permissions
                .check(ctx.role, VehicleStatus::Available, Action::Reserve);
            if !check.is_allowed() {
                warn!("{ctx}: allocation of {} denied: {}", vehicle.license_plate(), check.reason);
                return Allocation::Denied(check);
            }

            match vehicle.compare_and_set_status(VehicleStatus::Available, VehicleStatus::InUse) {
                StatusChange::Applied { report, .. } => {
                    info!(
                        "{ctx}: allocated {} {} via {}",
                        vehicle.id(),
                        vehicle.license_plate(),
                        strategy.name()
                    );
                    return Allocation::Allocated { vehicle, report };
                }
                StatusChange::Conflict { actual } => {
                    debug!(
                        "{ctx}: lost {} to a concurrent caller (now {actual}), attempt {attempt}/{attempts}",
                        vehicle.license_plate()
                    );
                    pool.retain(|v| !Arc::ptr_eq(v, &vehicle));
                }
            }
        }

        warn!("{ctx}: allocation gave up after {attempts} contended attempts");
        Allocation::Contended { attempts }
    }

    /// Move `vehicle` to RESERVED. Requires RESERVE in its current status.
    pub fn reserve(&self, ctx: &RequestContext, vehicle: &Vehicle) -> TransitionOutcome {
        self.transition(ctx, vehicle, Action::Reserve, VehicleStatus::Reserved)
    }

    /// Move `vehicle` to IN_MAINTENANCE. Requires PUT_IN_MAINTENANCE in its
    /// current status.
    pub fn put_in_maintenance(&self, ctx: &RequestContext, vehicle: &Vehicle) -> TransitionOutcome {
        self.transition(ctx, vehicle, Action::PutInMaintenance, VehicleStatus::InMaintenance)
    }

    /// Return `vehicle` to AVAILABLE with an updated odometer reading.
    ///
    /// Not gated by the permission matrix; `ctx` is only recorded in the log.
    pub fn release(
        &self,
        ctx: &RequestContext,
        vehicle: &Vehicle,
        mileage: f64,
    ) -> Result<TransitionOutcome, ValidationError> {
        let (previous, report) = vehicle.release(mileage)?;
        info!(
            "{ctx}: released {} {} ({previous} -> AVAILABLE, mileage {mileage})",
            vehicle.id(),
            vehicle.license_plate()
        );
        Ok(TransitionOutcome::Applied {
            previous,
            status: VehicleStatus::Available,
            report,
        })
    }

    fn transition(
        &self,
        ctx: &RequestContext,
        vehicle: &Vehicle,
        action: Action,
        next: VehicleStatus,
    ) -> TransitionOutcome {
        self.transition_from(ctx, vehicle, vehicle.status(), action, next)
    }

    /// Gate `action` on `observed` and move from `observed` to `next`.
    fn transition_from(
        &self,
        ctx: &RequestContext,
        vehicle: &Vehicle,
        observed: VehicleStatus,
        action: Action,
        next: VehicleStatus,
    ) -> TransitionOutcome {
        let check = self.permissions.check(ctx.role, observed, action);
        if !check.is_allowed() {
            warn!("{ctx}: {action} on {} denied: {}", vehicle.license_plate(), check.reason);
            return TransitionOutcome::Denied(check);
        }

        // The permission was granted for `observed`; refuse if that is stale.
        match vehicle.compare_and_set_status(observed, next) {
            StatusChange::Applied { previous, report } => {
                info!("{ctx}: {} {previous} -> {next}", vehicle.license_plate());
                TransitionOutcome::Applied {
                    previous,
                    status: next,
                    report,
                }
            }
            StatusChange::Conflict { actual } => {
                warn!(
                    "{ctx}: {action} on {} raced: expected {observed}, found {actual}",
                    vehicle.license_plate()
                );
                TransitionOutcome::Conflict { actual }
            }
        }
    }
}
