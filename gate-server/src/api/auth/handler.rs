//! Authentication Handlers
//!
//! Session issuance for both strategies, the strategy probe and the current
//! identity.

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use axum::{Json, extract::State};
use http::{HeaderMap, StatusCode, header};
use shared::client::{AuthTypeResponse, CurrentUserResponse, LoginRequest, LoginResponse};

use crate::auth::password::verify_password;
use crate::auth::permissions::effective_permission;
use crate::auth::{AuthStrategy, CurrentUser};
use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// Login handler
///
/// Strategy comes from the same header the gate reads.
pub async fn login(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let strategy = AuthStrategy::select(
        &headers,
        state.config.default_strategy,
        state.enabled_strategies(),
    )?;

    match strategy {
        AuthStrategy::Standard => Ok(Json(standard_login(&state, req).await?).into_response()),
        AuthStrategy::Delegated => delegated_login(&state, req).await,
    }
}

/// Verify credentials against the store and sign a session token
///
/// Unknown user and wrong password answer identically.
async fn standard_login(state: &ServerState, req: LoginRequest) -> Result<LoginResponse, AppError> {
    if req.password.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "password is required",
        ));
    }
    let username = req.username;

    let Some(user) = state.store.get_user(&username).await? else {
        tracing::warn!(username = %username, "Login failed - user not found");
        return Err(AppError::invalid_credentials());
    };

    let valid = verify_password(&req.password, &user.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        tracing::warn!(username = %username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let role_table = state.store.list_roles().await?;
    let (roles, permission) = effective_permission(&user.roles, &role_table)?;

    let mut session_user = user.sanitized();
    session_user.roles = roles;

    let (token, claims) = state
        .codec
        .issue(&session_user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    let expires_at = claims.expires_at();
    session_user.session_expiry = Some(expires_at);

    tracing::info!(
        username = %username,
        permission = permission.bits(),
        expires_at = %expires_at,
        "User logged in successfully"
    );

    Ok(LoginResponse {
        token,
        expires_at: expires_at.to_rfc3339(),
        permission: permission.bits(),
        user: session_user,
    })
}

/// Forward a password grant to the identity platform and relay its answer
async fn delegated_login(state: &ServerState, req: LoginRequest) -> Result<Response, AppError> {
    let identity = state.identity.as_ref().ok_or_else(|| {
        AppError::with_message(ErrorCode::UnsupportedAuthType, "auth type \"caas\" is not enabled")
    })?;

    let upstream = identity.password_grant(&req.username, &req.password).await?;

    if upstream.status == StatusCode::UNAUTHORIZED {
        tracing::warn!(username = %req.username, "Delegated login rejected by identity platform");
        return Err(AppError::invalid_credentials());
    }
    if upstream.status != StatusCode::OK {
        tracing::warn!(
            username = %req.username,
            status = upstream.status.as_u16(),
            "Delegated login returned unexpected status, passing through"
        );
    }

    let mut builder = Response::builder().status(upstream.status);
    if let Some(content_type) = upstream.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(upstream.body))
        .map_err(|e| AppError::internal(format!("Failed to relay upstream response: {}", e)))
}

/// Strategy probe
pub async fn auth_type(State(state): State<ServerState>) -> Json<AuthTypeResponse> {
    Json(AuthTypeResponse {
        default: state.config.default_strategy.as_str().to_string(),
        enabled: state
            .enabled_strategies()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
    })
}

/// Current identity as seen by the gate
pub async fn me(user: CurrentUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        username: user.username,
        strategy: user.strategy.as_str().to_string(),
        permission: user.permission.map(|p| p.bits()),
    })
}
