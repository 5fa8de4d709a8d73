use std::sync::Arc;

use super::{AllocationStrategy, first_best};
use crate::fleet::Vehicle;
use crate::specification::{Refrigeration, Specification};

/// Refrigerated trucks only; the lowest mileage wins, first one on ties.
pub struct RefrigerationPriority {
    filter: Refrigeration,
}

impl RefrigerationPriority {
    pub fn new() -> Self {
        Self {
            filter: Refrigeration(true),
        }
    }
}

impl Default for RefrigerationPriority {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationStrategy for RefrigerationPriority {
    fn name(&self) -> &'static str {
        "refrigeration"
    }

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>> {
        let refrigerated = candidates
            .iter()
            .filter(|v| self.filter.is_satisfied_by(v))
            .map(|v| (v, v.mileage()));
        // Reversed: lower mileage ranks higher.
        first_best(refrigerated, |(_, a), (_, b)| b.total_cmp(a)).map(|(v, _)| Arc::clone(v))
    }
}
