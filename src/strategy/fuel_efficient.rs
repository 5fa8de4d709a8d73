use std::sync::Arc;

use super::AllocationStrategy;
use crate::config::FuelEfficiencyConfig;
use crate::fleet::{EngineType, Vehicle};
use crate::specification::{BoxedSpecification, FuelEfficiency, HasEngineType, Specification};

/// First candidate, in list order, that is fuel-efficient.
///
/// A vehicle qualifies when its engine is one of the efficient engines, or
/// when it runs on petrol within the configured mileage and speed bounds.
/// This is a first-match rule, not a ranking.
pub struct FuelEfficient {
    filter: BoxedSpecification<Vehicle>,
}

impl FuelEfficient {
    pub fn from_config(config: &FuelEfficiencyConfig) -> Self {
        let petrol = FuelEfficiency {
            engine_type: EngineType::Petrol,
            max_mileage: config.petrol_max_mileage,
            min_max_speed: config.petrol_min_max_speed,
        }
        .boxed();
        let filter = config
            .efficient_engines
            .iter()
            .rev()
            .fold(petrol, |rest, &engine| HasEngineType(engine).or(rest).boxed());
        Self { filter }
    }
}

impl AllocationStrategy for FuelEfficient {
    fn name(&self) -> &'static str {
        "fuel_efficient"
    }

    fn allocate(&self, candidates: &[Arc<Vehicle>]) -> Option<Arc<Vehicle>> {
        candidates
            .iter()
            .find(|v| self.filter.is_satisfied_by(v))
            .map(Arc::clone)
    }
}
