use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use super::{ObserverError, StatusEvent, StatusObserver};
use crate::permission::{Action, PermissionMatrix, Role};

/// How an account responds to a vehicle entering a new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reaction {
    CanView,
    CanReserve,
    FullAccess,
    NoAction,
}

/// Reactions an account keeps; older ones are dropped first.
pub const REACTION_HISTORY: usize = 256;

/// A requester account watching a vehicle.
///
/// On each event it asks the permission matrix what its role may now do
/// with the vehicle and records the answer. Only the latest
/// [`REACTION_HISTORY`] reactions are kept.
pub struct AccountObserver {
    name: String,
    role: Role,
    permissions: Arc<PermissionMatrix>,
    reactions: Mutex<VecDeque<(StatusEvent, Reaction)>>,
}

impl AccountObserver {
    pub fn new(name: impl Into<String>, role: Role, permissions: Arc<PermissionMatrix>) -> Self {
        Self {
            name: name.into(),
            role,
            permissions,
            reactions: Mutex::new(VecDeque::new()),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The reaction this account would have to a vehicle in `event.status`.
    pub fn react(&self, event: &StatusEvent) -> Reaction {
        let allowed = |action| self.permissions.is_allowed(self.role, event.status, action);
        // FULL_ACCESS satisfies every lookup below, so it is tested first.
        let granted = self.permissions.allowed_actions(self.role, event.status);
        if granted.contains(&Action::FullAccess) {
            Reaction::FullAccess
        } else if allowed(Action::View) {
            Reaction::CanView
        } else if allowed(Action::Reserve) {
            Reaction::CanReserve
        } else {
            Reaction::NoAction
        }
    }

    pub fn reactions(&self) -> Vec<(StatusEvent, Reaction)> {
        self.reactions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn last_reaction(&self) -> Option<Reaction> {
        self.reactions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .map(|(_, reaction)| *reaction)
    }
}

impl StatusObserver for AccountObserver {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_status_changed(&self, event: &StatusEvent) -> Result<(), ObserverError> {
        let reaction = self.react(event);
        log::info!(
            "{} {} notified: {} is now {} ({reaction:?})",
            self.role,
            self.name,
            event.license_plate,
            event.status
        );
        let mut history = self.reactions.lock().unwrap_or_else(PoisonError::into_inner);
        if history.len() == REACTION_HISTORY {
            history.pop_front();
        }
        history.push_back((event.clone(), reaction));
        Ok(())
    }
}
