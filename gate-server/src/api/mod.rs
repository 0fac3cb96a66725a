//! API Routes
//!
//! Each module exposes its axum `router()` and the matching `routes()`
//! descriptors that feed the [`RouteRegistry`](crate::routes::RouteRegistry).
//! Paths are relative to `base_path + group_version`.
//!
//! - [`auth`] - login, strategy probe, current identity
//! - [`system`] - domain discovery
//! - [`license`] - license summary and import
//! - [`users`] - user management (protected `admin`)
//! - [`roles`] - role management (protected `admin`)

pub mod auth;
pub mod license;
pub mod roles;
pub mod system;
pub mod users;

use axum::Router;

use crate::core::ServerState;
use crate::routes::RouteDescriptor;

/// All API handlers, unprefixed
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(system::router())
        .merge(license::router())
        .merge(users::router())
        .merge(roles::router())
}

/// Capability requirements for every route in [`router`]
pub fn routes() -> Vec<RouteDescriptor> {
    [
        auth::routes(),
        system::routes(),
        license::routes(),
        users::routes(),
        roles::routes(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_duplicate_descriptors() {
        let all = routes();
        let unique: HashSet<_> = all.iter().map(|r| (r.method.clone(), r.path.clone())).collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_mutations_require_capabilities() {
        for route in routes() {
            if route.path.starts_with("/users") || route.path.starts_with("/roles") {
                assert!(route.requires_auth(), "{} {}", route.method, route.path);
                assert!(route.required.is_within_range());
                assert_ne!(route.required, shared::Capability::EMPTY);
            }
        }
    }
}
