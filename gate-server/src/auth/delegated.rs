//! Delegated (`caas`) strategy
//!
//! The caller presents a bearer token issued by the identity platform and
//! asserts a username. Authorization comes from the platform's global roles
//! for that user; the gateway never inspects the token itself.

use http::{HeaderMap, Method};

use crate::auth::permissions::access_denied;
use crate::auth::rules::roles_allow;
use crate::auth::{CurrentUser, extractor};
use crate::core::{Config, ServerState};
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Authenticate and authorize one request
///
/// Reading (`GET`) one's own profile or global-role listing is always granted
/// without contacting the platform; writes to it are checked like any other. Otherwise one bearer-authenticated role
/// lookup decides.
pub async fn authenticate(
    state: &ServerState,
    headers: &HeaderMap,
    method: &Method,
    path: &str,
) -> Result<CurrentUser, AppError> {
    let identity = state.identity.as_ref().ok_or_else(|| {
        AppError::with_message(ErrorCode::UnsupportedAuthType, "auth type \"caas\" is not enabled")
    })?;

    let (token, username) = extractor::delegated_credentials(headers)?;

    if is_self_service(&state.config, method, path, &username) {
        tracing::debug!(username = %username, path = %path, "Self-service access granted");
        return Ok(CurrentUser::delegated(username));
    }

    let roles = identity
        .global_roles(&username, &token)
        .await
        .map_err(|e| {
            security_log!(
                "WARN",
                "identity_lookup_failed",
                username = username.as_str(),
                error = e.to_string()
            );
            AppError::from(e)
        })?;

    if !roles_allow(&roles, method.as_str()) {
        security_log!(
            "WARN",
            "permission_denied",
            username = username.as_str(),
            method = method.as_str(),
            path = path,
            roles = roles.len()
        );
        return Err(access_denied(method.as_str(), path));
    }

    Ok(CurrentUser::delegated(username))
}

/// `GET` on exactly `{api}/users/{user}` or `{api}/users/{user}/globalroles`
pub fn is_self_service(config: &Config, method: &Method, path: &str, username: &str) -> bool {
    if *method != Method::GET || username.contains('/') {
        return false;
    }
    path == config.api_path(&format!("/users/{username}"))
        || path == config.api_path(&format!("/users/{username}/globalroles"))
}
