use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fleet::EngineType;
use crate::permission::Role;
use crate::strategy::StrategyKind;

/// Who is asking. Passed explicitly to every gated operation; there is no
/// ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Requester identity, used for logs and the audit trail.
    pub requester: String,
    pub role: Role,
}

impl RequestContext {
    pub fn new(requester: impl Into<String>, role: Role) -> Self {
        Self {
            requester: requester.into(),
            role,
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.role, self.requester)
    }
}

/// What the requester wants allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationCriteria {
    pub strategy: StrategyKind,
    /// Readiness threshold; falls back to `settings.default_min_fuel_level`.
    #[serde(default)]
    pub min_fuel_level: Option<f64>,
    /// Restrict candidates to one engine type.
    #[serde(default)]
    pub engine_type: Option<EngineType>,
}

impl AllocationCriteria {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            min_fuel_level: None,
            engine_type: None,
        }
    }

    pub fn with_min_fuel_level(mut self, min_fuel_level: f64) -> Self {
        self.min_fuel_level = Some(min_fuel_level);
        self
    }

    pub fn with_engine_type(mut self, engine_type: EngineType) -> Self {
        self.engine_type = Some(engine_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_from_json() {
        let criteria: AllocationCriteria = serde_json::from_str(
            r#"{
                "strategy": {"name": "comfort_priority", "min_passenger_capacity": 4},
                "engine_type": "HYBRID"
            }"#,
        )
        .unwrap();
        assert_eq!(
            criteria,
            AllocationCriteria::new(StrategyKind::ComfortPriority {
                min_passenger_capacity: 4
            })
            .with_engine_type(EngineType::Hybrid)
        );
    }

    #[test]
    fn context_display() {
        let ctx = RequestContext::new("max", Role::Manager);
        assert_eq!(ctx.to_string(), "MANAGER max");
    }
}
