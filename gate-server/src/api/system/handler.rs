use axum::{Json, extract::State};
use shared::client::DomainResponse;

use crate::core::ServerState;

/// Domain the gateway is served under
pub async fn domain(State(state): State<ServerState>) -> Json<DomainResponse> {
    Json(DomainResponse {
        domain: state.config.domain.clone(),
    })
}
