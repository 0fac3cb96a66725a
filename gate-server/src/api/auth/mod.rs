//! Authentication Routes
//!
//! - `POST /auth/login` - public, dispatches on the strategy header
//! - `GET /auth/type` - public strategy probe
//! - `GET /auth/me` - any authenticated caller

mod handler;

use axum::{Router, routing::get, routing::post};
use http::Method;
use shared::models::Capability;

use crate::core::ServerState;
use crate::routes::RouteDescriptor;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/auth/login", post(handler::login))
        .route("/auth/type", get(handler::auth_type))
        .route("/auth/me", get(handler::me))
}

pub fn routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::public(Method::POST, "/auth/login"),
        RouteDescriptor::public(Method::GET, "/auth/type"),
        RouteDescriptor::new(Method::GET, "/auth/me", Capability::EMPTY),
    ]
}
