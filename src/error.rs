//! Error types for input validation and configuration loading.
//!
//! Allocation misses, permission denials and status conflicts are not
//! errors; they are variants of [`Allocation`](crate::allocation::Allocation)
//! and [`TransitionOutcome`](crate::allocation::TransitionOutcome).

use thiserror::Error;

/// Malformed vehicle data, rejected where the value is constructed or assigned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("comfort level {0} is outside 1..=10")]
    ComfortLevelOutOfRange(u8),

    #[error("passenger capacity must be positive")]
    ZeroPassengerCapacity,

    #[error("cargo capacity must be a non-negative number, got {0}")]
    InvalidCargoCapacity(f64),

    #[error("fuel level must be a non-negative number, got {0}")]
    InvalidFuelLevel(f64),

    #[error("mileage must be a non-negative number, got {0}")]
    InvalidMileage(f64),

    #[error("max speed must be a positive number, got {0}")]
    InvalidMaxSpeed(f64),

    #[error("license plate must not be empty")]
    EmptyLicensePlate,

    #[error("license plate {0} is already registered")]
    DuplicateLicensePlate(String),

    #[error("mileage cannot go backwards: current {current}, requested {requested}")]
    MileageRegression { current: f64, requested: f64 },
}

/// Failure to read or parse a configuration source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An upper-case token (status, engine type, role, action) that names nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} token: {token}")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub token: String,
}

impl UnknownToken {
    pub(crate) fn new(kind: &'static str, token: &str) -> Self {
        Self {
            kind,
            token: token.to_string(),
        }
    }
}
