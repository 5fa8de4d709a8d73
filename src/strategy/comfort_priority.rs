use std::sync::Arc;

use super::{AllocationStrategy, first_best};
use crate::fleet::Vehicle;
use crate::specification::{MinPassengerCapacity, Specification};

/// Cars seating at least `min_passenger_capacity`.
///
/// Highest comfort level wins. Among equally comfortable cars the one with
/// the lower max speed wins, then the first in list order.
pub struct ComfortPriority {
    filter: MinPassengerCapacity,
}

impl ComfortPriority {
    pub fn new(min_passenger_capacity: u32) -> Self {
        Self {
            filter: MinPassengerCapacity(min_passenger_capacity),
        }
    }
}

impl AllocationStrategy for ComfortPriority {
    fn name(&self) -> &'static str {
        "comfort_priority"
    }

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>> {
        let cars = candidates
            .iter()
            .filter(|v| self.filter.is_satisfied_by(v))
            .filter_map(|v| Some((v, v.as_car()?.comfort_level(), v.max_speed())));
        first_best(cars, |(_, comfort_a, speed_a), (_, comfort_b, speed_b)| {
            comfort_a
                .cmp(comfort_b)
                .then_with(|| speed_b.total_cmp(speed_a))
        })
        .map(|(v, _, _)| Arc::clone(v))
    }
}
