//! Capability Definitions
//!
//! Named capability bits for the gateway's own routes, and the effective
//! permission computation used by the standard strategy and at login.
//!
//! ## Rules
//! - A role grants the bits in its `capability`
//! - A user's effective permission is the OR over their current roles
//! - Role references held by a user (or embedded in a token) only supply
//!   ids; capabilities always come from the store's role table

use shared::models::{Capability, Role};

use crate::AppError;

/// List users / read a user profile
pub const USER_READ: Capability = Capability::from_bits(1 << 0);
/// Create, update and delete users
pub const USER_WRITE: Capability = Capability::from_bits(1 << 1);
/// List roles
pub const ROLE_READ: Capability = Capability::from_bits(1 << 2);
/// Create, update and delete roles
pub const ROLE_WRITE: Capability = Capability::from_bits(1 << 3);

/// Named capabilities, for logging and role editors
pub const ALL_CAPABILITIES: &[(&str, Capability)] = &[
    ("users:read", USER_READ),
    ("users:write", USER_WRITE),
    ("roles:read", ROLE_READ),
    ("roles:write", ROLE_WRITE),
];

/// Names of the known bits set in `capability`
pub fn capability_names(capability: Capability) -> Vec<&'static str> {
    ALL_CAPABILITIES
        .iter()
        .filter(|(_, bit)| capability.contains(*bit))
        .map(|(name, _)| *name)
        .collect()
}

/// Refresh a user's role references against the role table
///
/// Returns the current roles (in the user's order, unknown ids dropped) and
/// their OR'ed capability. An empty role table means the store has lost its
/// role data and nothing can be authorized.
pub fn effective_permission(
    user_roles: &[Role],
    role_table: &[Role],
) -> Result<(Vec<Role>, Capability), AppError> {
    if role_table.is_empty() {
        return Err(AppError::store("role table is empty"));
    }

    let current: Vec<Role> = user_roles
        .iter()
        .filter_map(|held| role_table.iter().find(|r| r.id == held.id).cloned())
        .collect();
    let permission = current.iter().map(|r| r.capability).collect();

    Ok((current, permission))
}

/// Grant iff every required bit is present in `effective`
pub fn authorize(required: Capability, effective: Capability) -> bool {
    effective.contains(required)
}

/// 403 naming the denied route, never the reason
pub fn access_denied(method: &str, path: &str) -> AppError {
    AppError::permission_denied(format!("Permission denied: {method} {path}"))
}
