//! License Routes
//!
//! Both paths bypass the license gate so a license can always be imported.
//!
//! - `GET /license` - current license summary
//! - `POST /license/import` - verify and store a license

mod handler;

use axum::{Router, routing::get, routing::post};
use http::Method;

use crate::core::ServerState;
use crate::routes::RouteDescriptor;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/license", get(handler::current))
        .route("/license/import", post(handler::import))
}

pub fn routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::public(Method::GET, "/license"),
        RouteDescriptor::public(Method::POST, "/license/import"),
    ]
}
