//! fleet-allocator: rule-driven vehicle allocation for a mixed car/truck fleet.
//!
//! Given a pool of vehicles and a request, the crate filters candidates with
//! composable [`specification`]s, lets an [`strategy::AllocationStrategy`]
//! pick one, checks the requester's role against a
//! [`PermissionMatrix`](crate::permission::PermissionMatrix) and flips the
//! vehicle's status atomically. Every status change is pushed to the
//! vehicle's observers.
//!
//! # Architecture
//!
//! - **[`fleet`]**: Vehicle model: car/truck variants, status, fleet registry, JSON records.
//! - **[`specification`]**: Boolean predicates over vehicles with AND/OR/NOT composition.
//! - **[`strategy`]**: Allocation strategies and the serializable strategy selector.
//! - **[`permission`]**: Role × status → action matrix, default-deny.
//! - **[`notify`]**: Status observers, fault-isolated notification, account observers.
//! - **[`allocation`]**: Orchestrator: select, permission check, compare-and-swap transition.
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: stderr logger setup and the allocation audit trail.

/// Allocation orchestrator and its request/outcome types.
pub mod allocation;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Validation and configuration errors.
pub mod error;
/// Vehicles, statuses and the fleet registry.
pub mod fleet;
/// Logger initialisation and file-based audit logging.
pub mod logging;
/// Observer trait and notification dispatch.
pub mod notify;
/// Roles, actions and the permission matrix.
pub mod permission;
/// Composable vehicle predicates.
pub mod specification;
/// Allocation strategies.
pub mod strategy;

#[cfg(test)]
mod testing;

use allocation::Allocator;

/// Build an allocator from the embedded default configuration.
///
/// This is the main entry point for tests and simple usage.
/// For CLI usage with a user config, load it and call [`Allocator::from_config`].
pub fn allocator() -> Allocator {
    Allocator::from_config(config::Config::default_config())
}
