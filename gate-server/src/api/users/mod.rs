//! User Routes
//!
//! The `admin` user is protected: it cannot be created, modified or deleted
//! here.

mod handler;

use axum::{Router, routing::get};
use http::Method;

use crate::auth::permissions::{USER_READ, USER_WRITE};
use crate::core::ServerState;
use crate::routes::RouteDescriptor;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list).post(handler::create))
        .route(
            "/users/{name}",
            get(handler::get_by_name)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/users/{name}/globalroles", get(handler::global_roles))
}

pub fn routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new(Method::GET, "/users", USER_READ),
        RouteDescriptor::new(Method::POST, "/users", USER_WRITE),
        RouteDescriptor::new(Method::GET, "/users/{name}", USER_READ),
        RouteDescriptor::new(Method::PUT, "/users/{name}", USER_WRITE),
        RouteDescriptor::new(Method::DELETE, "/users/{name}", USER_WRITE),
        RouteDescriptor::new(Method::GET, "/users/{name}/globalroles", USER_READ),
    ]
}
