//! Routing and app assembly
//!
//! - [`registry`] - route -> required capability table
//! - [`exempt`] - authentication-exempt paths
//! - [`logging`] - request logging middleware
//! - [`build_app`] - router plus the full middleware stack

pub mod exempt;
pub mod logging;
pub mod registry;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use http::{HeaderValue, Method, Uri};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::AppError;
use crate::auth::gate;
use crate::core::ServerState;

pub use exempt::{ExemptPaths, ExemptPatternError};
pub use registry::{RouteDescriptor, RouteRegistry};

/// Request ID generator
#[derive(Clone, Copy, Default)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All API routes under `base_path + group_version`, no middleware
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    let prefix = state.api_path("/");
    let api = crate::api::router();

    let router = if prefix == "/" {
        api
    } else {
        Router::new().nest(&prefix, api)
    };
    router.fallback(fallback)
}

/// Router with the complete filter chain, outermost last:
///
/// ```text
/// CORS -> trace -> request id -> request log -> gate -> handler
/// ```
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router(state)
        .layer(from_fn_with_state(state.clone(), gate))
        .layer(from_fn(logging::logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(XRequestId))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn fallback(method: Method, uri: Uri) -> AppError {
    AppError::route_not_found(method.as_str(), uri.path())
}
