//! Route permission registry
//!
//! Every route the gateway serves declares the capability it requires. The
//! table is built once at startup and only read afterwards.

use std::collections::HashMap;

use http::Method;
use shared::models::Capability;

/// A route and the capability it requires
///
/// Declared with a path relative to the API prefix; [`RouteRegistry::register`]
/// stores it under the composed full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub method: Method,
    pub path: String,
    pub required: Capability,
    pub auth_required: bool,
}

impl RouteDescriptor {
    /// Authenticated route requiring `required`
    pub fn new(method: Method, path: impl Into<String>, required: Capability) -> Self {
        Self {
            method,
            path: path.into(),
            required,
            auth_required: true,
        }
    }

    /// Route reachable without any credentials
    pub fn public(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            required: Capability::NO_AUTH,
            auth_required: false,
        }
    }

    /// False when the route skips token lookup entirely
    pub fn requires_auth(&self) -> bool {
        self.auth_required && !self.required.is_no_auth()
    }
}

/// Immutable `(method, full path) -> route` table
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<(Method, String), RouteDescriptor>,
}

impl RouteRegistry {
    /// Build the table, composing `base_path + group_version + route.path`
    ///
    /// A duplicate method + path replaces the earlier entry.
    pub fn register(
        base_path: &str,
        group_version: &str,
        descriptors: impl IntoIterator<Item = RouteDescriptor>,
    ) -> Self {
        let mut routes = HashMap::new();
        for mut route in descriptors {
            route.path = compose_path(base_path, group_version, &route.path);
            let key = (route.method.clone(), route.path.clone());
            if let Some(previous) = routes.insert(key, route) {
                tracing::warn!(
                    method = %previous.method,
                    path = %previous.path,
                    "Duplicate route registration, last one wins"
                );
            }
        }

        tracing::debug!(count = routes.len(), "Route registry built");
        Self { routes }
    }

    /// Exact method + normalized path lookup
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&RouteDescriptor> {
        self.routes.get(&(method.clone(), normalize_path(path)))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.values()
    }
}

/// `base_path + group_version + path`, one leading slash, no trailing slash
pub fn compose_path(base_path: &str, group_version: &str, path: &str) -> String {
    normalize_path(&format!("{base_path}/{group_version}/{path}"))
}

/// Collapse repeated slashes, ensure a leading slash, drop a trailing one
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}
