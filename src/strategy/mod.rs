//! Allocation strategies: pick one vehicle from a candidate list.
//!
//! Each strategy owns the specification it filters with and a
//! deterministic tie-break. When several candidates rank equal, the one
//! met first in list order wins. An empty result is a normal outcome.

/// Trucks ranked by cargo per unit of fuel.
pub mod cargo_priority;
/// Cars ranked by comfort, then by lower top speed.
pub mod comfort_priority;
/// Mileage closest to a task distance.
pub mod distance;
/// First candidate passing the fuel-efficiency rule.
pub mod fuel_efficient;
/// Most fuel on board.
pub mod high_fuel;
/// Fastest unrefrigerated truck.
pub mod high_speed;
/// First truck large enough for a load.
pub mod load_capacity;
/// Least-worn refrigerated truck.
pub mod refrigeration;

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::fleet::Vehicle;

/// Trait for allocation strategies.
///
/// Implementations receive an already readiness-filtered list and return at
/// most one of its elements.
pub trait AllocationStrategy: Send + Sync {
    /// Stable identifier used in logs and the audit trail.
    fn name(&self) -> &'static str;

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>>;
}

/// Serializable strategy selector with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum StrategyKind {
    CargoPriority { min_cargo_capacity: f64 },
    Refrigeration,
    NonRefrigeratedHighSpeed,
    ComfortPriority { min_passenger_capacity: u32 },
    FuelEfficient,
    HighFuelLevel,
    LoadCapacity { required_capacity: f64 },
    DistanceBased { task_distance: f64 },
}

impl StrategyKind {
    /// Build the strategy from configuration.
    pub fn build(&self, config: &Config) -> Box<dyn AllocationStrategy> {
        use self::{
            cargo_priority::CargoPriority, comfort_priority::ComfortPriority,
            distance::DistanceBased, fuel_efficient::FuelEfficient, high_fuel::HighFuelLevel,
            high_speed::NonRefrigeratedHighSpeed, load_capacity::LoadCapacity,
            refrigeration::RefrigerationPriority,
        };

        match *self {
            StrategyKind::CargoPriority { min_cargo_capacity } => {
                Box::new(CargoPriority::new(min_cargo_capacity))
            }
            StrategyKind::Refrigeration => Box::new(RefrigerationPriority::new()),
            StrategyKind::NonRefrigeratedHighSpeed => Box::new(NonRefrigeratedHighSpeed::new()),
            StrategyKind::ComfortPriority {
                min_passenger_capacity,
            } => Box::new(ComfortPriority::new(min_passenger_capacity)),
            StrategyKind::FuelEfficient => {
                Box::new(FuelEfficient::from_config(&config.fuel_efficiency))
            }
            StrategyKind::HighFuelLevel => Box::new(HighFuelLevel),
            StrategyKind::LoadCapacity { required_capacity } => {
                Box::new(LoadCapacity::new(required_capacity))
            }
            StrategyKind::DistanceBased { task_distance } => {
                Box::new(DistanceBased::new(task_distance))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::CargoPriority { .. } => "cargo_priority",
            StrategyKind::Refrigeration => "refrigeration",
            StrategyKind::NonRefrigeratedHighSpeed => "non_refrigerated_high_speed",
            StrategyKind::ComfortPriority { .. } => "comfort_priority",
            StrategyKind::FuelEfficient => "fuel_efficient",
            StrategyKind::HighFuelLevel => "high_fuel_level",
            StrategyKind::LoadCapacity { .. } => "load_capacity",
            StrategyKind::DistanceBased { .. } => "distance_based",
        }
    }
}

/// Fold to the best item, keeping the earliest one on ties.
///
/// `order(item, best)` returns `Greater` when `item` should replace `best`.
pub(crate) fn first_best<T>(
    items: impl IntoIterator<Item = T>,
    mut order: impl FnMut(&T, &T) -> Ordering,
) -> Option<T> {
    items.into_iter().fold(None, |best, item| match best {
        Some(best) if order(&item, &best) != Ordering::Greater => Some(best),
        _ => Some(item),
    })
}
