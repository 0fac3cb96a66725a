//! Authorization gate middleware
//!
//! Runs in front of every handler, after CORS:
//!
//! 1. `OPTIONS` preflight passes through
//! 2. license gate (license paths exempt)
//! 3. exempt paths pass through
//! 4. strategy selection from `x-auth-type`
//! 5. route lookup by method + matched template (miss: 404)
//! 6. routes without auth pass through
//! 7. strategy authenticates + authorizes, [`CurrentUser`] is injected
//!
//! The first failing stage answers; nothing later runs.

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::Method;

use crate::AppError;
use crate::auth::{AuthStrategy, CurrentUser, delegated, standard};
use crate::core::ServerState;
use crate::routes::exempt::is_license_path;
use crate::security_log;

/// Gate middleware, installed with `from_fn_with_state`
///
/// # Errors
///
/// | Stage | Failure | Status |
/// |-------|---------|--------|
/// | license | store error | 500 |
/// | license | missing or rejected | 401 |
/// | strategy | unknown / disabled value | 400 |
/// | lookup | unregistered route | 404 |
/// | strategy | see [`standard::authenticate`], [`delegated::authenticate`] | 400/401/403/500 |
pub async fn gate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path().to_string();

    if !is_license_path(&state.config, &path) {
        check_license(&state, &path).await?;
    }

    if state.exempt.is_exempt(&path) {
        return Ok(next.run(req).await);
    }

    let strategy = AuthStrategy::select(
        req.headers(),
        state.config.default_strategy,
        state.enabled_strategies(),
    )?;

    let template = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let Some(route) = state.registry.lookup(req.method(), &template) else {
        return Err(AppError::route_not_found(req.method().as_str(), &path));
    };

    if !route.requires_auth() {
        return Ok(next.run(req).await);
    }

    let user = match strategy {
        AuthStrategy::Standard => {
            standard::authenticate(&state, req.headers(), req.uri(), req.method(), route).await?
        }
        AuthStrategy::Delegated => {
            delegated::authenticate(&state, req.headers(), req.method(), &path).await?
        }
    };

    req.extensions_mut().insert(user.clone());
    let mut response = next.run(req).await;
    // Visible to outer layers (request logging)
    response.extensions_mut().insert(user);
    Ok(response)
}

/// Fails closed: no license, an unreadable one or an expired one all stop the request
async fn check_license(state: &ServerState, path: &str) -> Result<(), AppError> {
    let Some(license) = state.store.get_license().await? else {
        security_log!("WARN", "license_missing", path = path);
        return Err(AppError::license_invalid("no license imported"));
    };

    state
        .license_verifier
        .verify(&license.content)
        .map_err(|e| {
            security_log!("WARN", "license_rejected", path = path, error = e.to_string());
            AppError::license_invalid(e.to_string())
        })?;

    Ok(())
}
