//! Role, action and grant tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownToken;

/// Requester role. Belongs to the request, never to the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Driver,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Driver, Role::Manager, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Driver => "DRIVER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownToken::new("role", s))
    }
}

/// Something a requester may do to a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    View,
    Reserve,
    PutInMaintenance,
    /// Implies every other action unless that action is explicitly denied.
    FullAccess,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::View,
        Action::Reserve,
        Action::PutInMaintenance,
        Action::FullAccess,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "VIEW",
            Action::Reserve => "RESERVE",
            Action::PutInMaintenance => "PUT_IN_MAINTENANCE",
            Action::FullAccess => "FULL_ACCESS",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownToken::new("action", s))
    }
}

const DENY_PREFIX: &str = "DENY_";

/// One entry of a permission cell: `RESERVE` or `DENY_RESERVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grant {
    Allow(Action),
    Deny(Action),
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grant::Allow(action) => write!(f, "{action}"),
            Grant::Deny(action) => write!(f, "{DENY_PREFIX}{action}"),
        }
    }
}

impl FromStr for Grant {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(DENY_PREFIX) {
            Some(action) => action
                .parse()
                .map(Grant::Deny)
                .map_err(|_| UnknownToken::new("grant", s)),
            None => s
                .parse()
                .map(Grant::Allow)
                .map_err(|_| UnknownToken::new("grant", s)),
        }
    }
}
