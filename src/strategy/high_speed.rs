use std::sync::Arc;

use super::{AllocationStrategy, first_best};
use crate::fleet::Vehicle;
use crate::specification::{Refrigeration, Specification};

/// Trucks without a refrigeration unit; the highest max speed wins.
pub struct NonRefrigeratedHighSpeed {
    filter: Refrigeration,
}

impl NonRefrigeratedHighSpeed {
    pub fn new() -> Self {
        Self {
            filter: Refrigeration(false),
        }
    }
}

impl Default for NonRefrigeratedHighSpeed {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationStrategy for NonRefrigeratedHighSpeed {
    fn name(&self) -> &'static str {
        "non_refrigerated_high_speed"
    }

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>> {
        let trucks = candidates
            .iter()
            .filter(|v| self.filter.is_satisfied_by(v));
        first_best(trucks, |a, b| a.max_speed().total_cmp(&b.max_speed())).map(Arc::clone)
    }
}
