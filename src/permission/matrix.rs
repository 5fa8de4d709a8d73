use std::collections::HashMap;

use super::action::{Action, Grant, Role};
use super::decision::PermissionCheck;
use crate::config::{Config, PermissionTable};
use crate::fleet::VehicleStatus;

/// Role × status → grants lookup that gates every mutating transition.
///
/// Built once from configuration and never mutated afterwards; share it
/// behind an `Arc`. Lookups resolve in this order:
/// 1. role or status absent from the table → deny
/// 2. `DENY_<action>` present → deny
/// 3. `<action>` or `FULL_ACCESS` present → allow
/// 4. otherwise → deny
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    table: HashMap<Role, HashMap<VehicleStatus, Vec<Grant>>>,
}

impl PermissionMatrix {
    pub fn from_config(config: &Config) -> Self {
        Self::from_table(&config.permissions)
    }

    /// Build from the raw token table. Unknown role, status or grant tokens
    /// are logged and skipped.
    pub fn from_table(raw: &PermissionTable) -> Self {
        let mut table: HashMap<Role, HashMap<VehicleStatus, Vec<Grant>>> = HashMap::new();

        for (role_token, cells) in raw {
            let role: Role = match role_token.parse() {
                Ok(role) => role,
                Err(e) => {
                    log::warn!("permission table: {e}; role skipped");
                    continue;
                }
            };
            let by_status = table.entry(role).or_default();

            for (status_token, grant_tokens) in cells {
                let status: VehicleStatus = match status_token.parse() {
                    Ok(status) => status,
                    Err(e) => {
                        log::warn!("permission table: {role}: {e}; cell skipped");
                        continue;
                    }
                };
                let grants = grant_tokens
                    .iter()
                    .filter_map(|token| match token.parse::<Grant>() {
                        Ok(grant) => Some(grant),
                        Err(e) => {
                            log::warn!("permission table: {role}/{status}: {e}; ignored");
                            None
                        }
                    })
                    .collect();
                by_status.insert(status, grants);
            }
        }

        Self { table }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.table.contains_key(&role)
    }

    fn grants(&self, role: Role, status: VehicleStatus) -> Option<&[Grant]> {
        self.table.get(&role)?.get(&status).map(Vec::as_slice)
    }

    /// Resolve `(role, status, action)` and explain the verdict.
    pub fn check(&self, role: Role, status: VehicleStatus, action: Action) -> PermissionCheck {
        if !self.has_role(role) {
            return PermissionCheck::deny(format!("{role} has no permissions"));
        }
        let Some(grants) = self.grants(role, status) else {
            return PermissionCheck::deny(format!("{role} has no permissions on {status} vehicles"));
        };
        if grants.contains(&Grant::Deny(action)) {
            return PermissionCheck::deny(format!("{action} denied to {role} on {status} vehicles"));
        }
        if grants.contains(&Grant::Allow(action)) {
            return PermissionCheck::allow(format!("{action} granted to {role} on {status} vehicles"));
        }
        if grants.contains(&Grant::Allow(Action::FullAccess)) {
            return PermissionCheck::allow(format!("{role} has full access to {status} vehicles"));
        }
        PermissionCheck::deny(format!("{action} not granted to {role} on {status} vehicles"))
    }

    pub fn is_allowed(&self, role: Role, status: VehicleStatus, action: Action) -> bool {
        self.check(role, status, action).is_allowed()
    }

    /// Token form of [`is_allowed`](Self::is_allowed). Unknown tokens deny.
    pub fn is_action_allowed(&self, role: Role, status: VehicleStatus, action: &str) -> bool {
        match action.parse::<Action>() {
            Ok(action) => self.is_allowed(role, status, action),
            Err(_) => false,
        }
    }

    /// Actions explicitly granted for `(role, status)`, in table order.
    /// Deny tokens are not listed; an absent cell yields an empty list.
    pub fn allowed_actions(&self, role: Role, status: VehicleStatus) -> Vec<Action> {
        self.grants(role, status)
            .unwrap_or_default()
            .iter()
            .filter_map(|grant| match grant {
                Grant::Allow(action) => Some(*action),
                Grant::Deny(_) => None,
            })
            .collect()
    }
}
