//! Role Routes
//!
//! The `admin` role is protected: it cannot be created, renamed or deleted
//! here. Capabilities are limited to `Capability::MAX`.

mod handler;

use axum::{Router, routing::get, routing::put};
use http::Method;

use crate::auth::permissions::{ROLE_READ, ROLE_WRITE};
use crate::core::ServerState;
use crate::routes::RouteDescriptor;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/roles", get(handler::list).post(handler::create))
        .route("/roles/{id}", put(handler::update).delete(handler::delete))
}

pub fn routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new(Method::GET, "/roles", ROLE_READ),
        RouteDescriptor::new(Method::POST, "/roles", ROLE_WRITE),
        RouteDescriptor::new(Method::PUT, "/roles/{id}", ROLE_WRITE),
        RouteDescriptor::new(Method::DELETE, "/roles/{id}", ROLE_WRITE),
    ]
}
