use std::sync::Arc;

use super::AllocationStrategy;
use crate::fleet::Vehicle;
use crate::specification::{MinCargoCapacity, Specification};

/// First truck, in list order, that can carry `required_capacity`.
pub struct LoadCapacity {
    filter: MinCargoCapacity,
}

impl LoadCapacity {
    pub fn new(required_capacity: f64) -> Self {
        Self {
            filter: MinCargoCapacity(required_capacity),
        }
    }
}

impl AllocationStrategy for LoadCapacity {
    fn name(&self) -> &'static str {
        "load_capacity"
    }

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>> {
        candidates
            .iter()
            .find(|v| self.filter.is_satisfied_by(v))
            .map(Arc::clone)
    }
}
