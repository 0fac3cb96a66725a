//! User Handlers

use axum::extract::{Path, State};
use axum::Json;
use http::HeaderMap;
use shared::models::{GlobalRole, Role, User, UserCreate, UserUpdate, is_protected_username};

use crate::auth::password::hash_password;
use crate::auth::{AuthStrategy, CurrentUser, extractor};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// List users, passwords cleared
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users.iter().map(User::sanitized).collect()))
}

/// Get one user, password cleared
pub async fn get_by_name(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<User>> {
    let user = find_user(&state, &name).await?;
    Ok(Json(user.sanitized()))
}

/// Create a user
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    if is_protected_username(&payload.username) {
        security_log!(
            "WARN",
            "protected_user_mutation",
            caller = caller.username.as_str(),
            target = payload.username.as_str(),
            action = "create"
        );
        return Err(AppError::new(ErrorCode::CannotModifyAdmin));
    }
    if payload.username.trim().is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "username is required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "password is required"));
    }
    if state.store.get_user(&payload.username).await?.is_some() {
        return Err(AppError::conflict(
            ErrorCode::UsernameExists,
            format!("User {} already exists", payload.username),
        ));
    }

    let mut user = User::new(payload.username);
    user.phone = payload.phone;
    user.roles = resolve_roles(&state, &payload.roles).await?;
    user.password = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    state.store.create_or_update_user(user.clone()).await?;
    tracing::info!(username = %user.username, by = %caller.username, "User created");

    Ok(Json(user.sanitized()))
}

/// Update a user, optionally renaming it
pub async fn update(
    State(state): State<ServerState>,
    caller: CurrentUser,
    Path(name): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    let renamed_to_admin = payload
        .username
        .as_deref()
        .is_some_and(is_protected_username);
    if is_protected_username(&name) || renamed_to_admin {
        security_log!(
            "WARN",
            "protected_user_mutation",
            caller = caller.username.as_str(),
            target = name.as_str(),
            action = "update"
        );
        return Err(AppError::new(ErrorCode::CannotModifyAdmin));
    }

    let mut user = find_user(&state, &name).await?;

    if let Some(new_name) = payload.username.as_deref().filter(|n| *n != name) {
        if new_name.trim().is_empty() {
            return Err(AppError::with_message(ErrorCode::RequiredField, "username is required"));
        }
        if state.store.get_user(new_name).await?.is_some() {
            return Err(AppError::conflict(
                ErrorCode::UsernameExists,
                format!("User {} already exists", new_name),
            ));
        }
        user.username = new_name.to_string();
    }
    if let Some(password) = payload.password.as_deref() {
        if password.is_empty() {
            return Err(AppError::with_message(ErrorCode::RequiredField, "password is required"));
        }
        user.password = hash_password(password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    }
    if let Some(phone) = payload.phone {
        user.phone = phone;
    }
    if let Some(role_ids) = payload.roles.as_deref() {
        user.roles = resolve_roles(&state, role_ids).await?;
    }

    state.store.create_or_update_user(user.clone()).await?;
    if user.username != name {
        state.store.delete_user(&name).await?;
    }
    tracing::info!(username = %user.username, previous = %name, by = %caller.username, "User updated");

    Ok(Json(user.sanitized()))
}

/// Delete a user
pub async fn delete(
    State(state): State<ServerState>,
    caller: CurrentUser,
    Path(name): Path<String>,
) -> AppResult<Json<bool>> {
    if is_protected_username(&name) {
        security_log!(
            "WARN",
            "protected_user_mutation",
            caller = caller.username.as_str(),
            target = name.as_str(),
            action = "delete"
        );
        return Err(AppError::new(ErrorCode::CannotDeleteAdmin));
    }

    if !state.store.delete_user(&name).await? {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }
    tracing::info!(username = %name, by = %caller.username, "User deleted");

    Ok(Json(true))
}

/// Global roles held on the identity platform
///
/// Relayed with the caller's own bearer token; only meaningful for `caas`
/// callers.
pub async fn global_roles(
    State(state): State<ServerState>,
    caller: CurrentUser,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<GlobalRole>>> {
    let identity = match (caller.strategy, state.identity.as_ref()) {
        (AuthStrategy::Delegated, Some(identity)) => identity,
        _ => {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedAuthType,
                "global roles are served by the identity platform (auth type \"caas\")",
            ));
        }
    };

    let (token, _) = extractor::delegated_credentials(&headers)?;
    let roles = identity.global_roles(&name, &token).await?;
    Ok(Json(roles))
}

async fn find_user(state: &ServerState, name: &str) -> AppResult<User> {
    state
        .store
        .get_user(name)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::UserNotFound, format!("User {} not found", name)))
}

/// Resolve role ids against the store, in the given order
async fn resolve_roles(state: &ServerState, ids: &[String]) -> AppResult<Vec<Role>> {
    let mut roles = Vec::with_capacity(ids.len());
    for id in ids {
        let role = state
            .store
            .get_role(id)
            .await?
            .ok_or_else(|| AppError::with_message(ErrorCode::RoleNotFound, format!("Role {} not found", id)))?;
        roles.push(role);
    }
    Ok(roles)
}
