use std::sync::Arc;

use super::{AllocationStrategy, first_best};
use crate::fleet::Vehicle;

/// Vehicle whose mileage is closest to `task_distance`; first one on ties.
pub struct DistanceBased {
    task_distance: f64,
}

impl DistanceBased {
    pub fn new(task_distance: f64) -> Self {
        Self { task_distance }
    }
}

impl AllocationStrategy for DistanceBased {
    fn name(&self) -> &'static str {
        "distance_based"
    }

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>> {
        let gaps = candidates
            .iter()
            .map(|v| (v, (v.mileage() - self.task_distance).abs()));
        // Reversed: a smaller gap ranks higher.
        first_best(gaps, |(_, a), (_, b)| b.total_cmp(a)).map(|(v, _)| Arc::clone(v))
    }
}
