use std::sync::Arc;

use super::{AllocationStrategy, first_best};
use crate::fleet::Vehicle;

/// Most fuel on board wins; first one on ties. Empty tanks are never picked.
pub struct HighFuelLevel;

impl AllocationStrategy for HighFuelLevel {
    fn name(&self) -> &'static str {
        "high_fuel_level"
    }

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>> {
        let fuelled = candidates
            .iter()
            .map(|v| (v, v.fuel_level()))
            .filter(|(_, fuel)| *fuel > 0.0);
        first_best(fuelled, |(_, a), (_, b)| a.total_cmp(b)).map(|(v, _)| Arc::clone(v))
    }
}
