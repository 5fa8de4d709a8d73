use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownToken;

/// Operational state of a vehicle. The only attribute the allocator mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    InUse,
    InMaintenance,
    Reserved,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 4] = [
        VehicleStatus::Available,
        VehicleStatus::InUse,
        VehicleStatus::InMaintenance,
        VehicleStatus::Reserved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::InUse => "IN_USE",
            VehicleStatus::InMaintenance => "IN_MAINTENANCE",
            VehicleStatus::Reserved => "RESERVED",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownToken::new("status", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl EngineType {
    pub const ALL: [EngineType; 4] = [
        EngineType::Petrol,
        EngineType::Diesel,
        EngineType::Electric,
        EngineType::Hybrid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EngineType::Petrol => "PETROL",
            EngineType::Diesel => "DIESEL",
            EngineType::Electric => "ELECTRIC",
            EngineType::Hybrid => "HYBRID",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineType {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineType::ALL
            .into_iter()
            .find(|engine| engine.as_str() == s)
            .ok_or_else(|| UnknownToken::new("engine type", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens_parse_back() {
        for status in VehicleStatus::ALL {
            assert_eq!(status.as_str().parse::<VehicleStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_rejected() {
        let err = "PARKED".parse::<VehicleStatus>().unwrap_err();
        assert_eq!(err.token, "PARKED");
        assert_eq!(err.kind, "status");
    }

    #[test]
    fn status_serializes_as_token() {
        let json = serde_json::to_string(&VehicleStatus::InMaintenance).unwrap();
        assert_eq!(json, "\"IN_MAINTENANCE\"");
    }

    #[test]
    fn engine_parse_is_case_sensitive() {
        assert_eq!("HYBRID".parse::<EngineType>(), Ok(EngineType::Hybrid));
        assert!("hybrid".parse::<EngineType>().is_err());
    }
}
