//! Cargo-priority allocation.
//!
//! Considers unrefrigerated trucks with enough cargo capacity and picks the
//! one carrying the most cargo per unit of fuel on board.

use std::sync::Arc;

use super::{AllocationStrategy, first_best};
use crate::fleet::Vehicle;
use crate::specification::{
    AndSpecification, MinCargoCapacity, NotSpecification, Refrigeration, Specification,
};

/// Evaluation order:
/// 1. Keep trucks with cargo capacity ≥ `min_cargo_capacity` and no refrigeration unit
/// 2. Drop trucks with an empty tank (the ratio is undefined)
/// 3. Highest `cargo_capacity / fuel_level` wins; first one on ties
pub struct CargoPriority {
    filter: AndSpecification<MinCargoCapacity, NotSpecification<Refrigeration>>,
}

impl CargoPriority {
    pub fn new(min_cargo_capacity: f64) -> Self {
        Self {
            filter: MinCargoCapacity(min_cargo_capacity).and(Refrigeration(true).not()),
        }
    }
}

impl AllocationStrategy for CargoPriority {
    fn name(&self) -> &'static str {
        "cargo_priority"
    }

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>> {
        let ranked = candidates
            .iter()
            .filter(|v| self.filter.is_satisfied_by(v))
            .filter_map(|v| {
                let truck = v.as_truck()?;
                let fuel = v.fuel_level();
                (fuel > 0.0).then(|| (v, truck.cargo_capacity() / fuel))
            });
        first_best(ranked, |(_, a), (_, b)| a.total_cmp(b)).map(|(v, _)| Arc::clone(v))
    }
}
