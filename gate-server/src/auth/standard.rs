//! Standard strategy
//!
//! Locally signed session token + capability bitmask. The token only
//! identifies the caller; the user and the role table are reloaded from the
//! store on every request.

use http::{HeaderMap, Method, Uri};

use crate::AppError;
use crate::auth::permissions::{access_denied, authorize, capability_names, effective_permission};
use crate::auth::{CurrentUser, TokenError, extractor};
use crate::core::ServerState;
use crate::routes::RouteDescriptor;
use crate::security_log;

/// Authenticate and authorize one request against `route`
///
/// | Failure | Status |
/// |---------|--------|
/// | no token / bad base64 query token | 400 |
/// | bad signature, malformed, expired | 401 |
/// | user no longer exists | 403 |
/// | store error, empty role table | 500 |
/// | missing capability bits | 403 |
pub async fn authenticate(
    state: &ServerState,
    headers: &HeaderMap,
    uri: &Uri,
    method: &Method,
    route: &RouteDescriptor,
) -> Result<CurrentUser, AppError> {
    let path = uri.path();
    let token = extractor::standard_token(headers, uri)?;

    let claims = state.codec.verify(&token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.to_string(),
            method = method.as_str(),
            path = path
        );
        match e {
            TokenError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;
    let username = claims.user.username;

    let Some(user) = state.store.get_user(&username).await? else {
        security_log!(
            "WARN",
            "user_not_found",
            username = username.as_str(),
            method = method.as_str(),
            path = path
        );
        return Err(access_denied(method.as_str(), path));
    };

    let role_table = state.store.list_roles().await?;
    let (_, permission) = effective_permission(&user.roles, &role_table)?;

    if !authorize(route.required, permission) {
        security_log!(
            "WARN",
            "permission_denied",
            username = username.as_str(),
            method = method.as_str(),
            path = path,
            required = route.required.bits(),
            granted = capability_names(permission).join(",")
        );
        return Err(access_denied(method.as_str(), path));
    }

    Ok(CurrentUser::standard(username, permission))
}
