//! System Routes
//!
//! - `GET /domain` - public domain discovery

mod handler;

use axum::{Router, routing::get};
use http::Method;

use crate::core::ServerState;
use crate::routes::RouteDescriptor;

pub fn router() -> Router<ServerState> {
    Router::new().route("/domain", get(handler::domain))
}

pub fn routes() -> Vec<RouteDescriptor> {
    vec![RouteDescriptor::public(Method::GET, "/domain")]
}
