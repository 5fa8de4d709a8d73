//! Role-based gate on vehicle state transitions.

pub mod action;
pub mod decision;
pub mod matrix;

pub use action::{Action, Grant, Role};
pub use decision::{Decision, PermissionCheck};
pub use matrix::PermissionMatrix;
