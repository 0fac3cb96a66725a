//! Role Handlers

use axum::extract::{Path, State};
use axum::Json;
use shared::models::{Capability, Role, RoleCreate, RoleUpdate, is_protected_role_name};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// List roles
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.store.list_roles().await?))
}

/// Create a role
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<Role>> {
    if is_protected_role_name(&payload.name) {
        protected_role_denied(&caller, &payload.name, "create");
        return Err(AppError::new(ErrorCode::CannotModifyAdminRole));
    }
    if payload.id.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "role id and name are required",
        ));
    }
    let capability = checked_capability(payload.capability)?;

    if state.store.get_role(&payload.id).await?.is_some() {
        return Err(AppError::conflict(
            ErrorCode::AlreadyExists,
            format!("Role {} already exists", payload.id),
        ));
    }
    ensure_name_free(&state, &payload.name, None).await?;

    let role = Role::new(payload.id, payload.name, capability);
    state.store.create_or_update_role(role.clone()).await?;
    tracing::info!(role_id = %role.id, name = %role.name, capability = role.capability.bits(), by = %caller.username, "Role created");

    Ok(Json(role))
}

/// Rename a role and/or change its capability
pub async fn update(
    State(state): State<ServerState>,
    caller: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    let mut role = find_role(&state, &id).await?;

    let renamed_to_admin = payload.name.as_deref().is_some_and(is_protected_role_name);
    if role.is_protected() || renamed_to_admin {
        protected_role_denied(&caller, &role.name, "update");
        return Err(AppError::new(ErrorCode::CannotModifyAdminRole));
    }

    if let Some(name) = payload.name.filter(|n| *n != role.name) {
        if name.trim().is_empty() {
            return Err(AppError::with_message(ErrorCode::RequiredField, "role name is required"));
        }
        ensure_name_free(&state, &name, Some(&id)).await?;
        role.name = name;
    }
    if let Some(bits) = payload.capability {
        role.capability = checked_capability(bits)?;
    }

    state.store.create_or_update_role(role.clone()).await?;
    tracing::info!(role_id = %role.id, name = %role.name, capability = role.capability.bits(), by = %caller.username, "Role updated");

    Ok(Json(role))
}

/// Delete a role
pub async fn delete(
    State(state): State<ServerState>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let role = find_role(&state, &id).await?;
    if role.is_protected() {
        protected_role_denied(&caller, &role.name, "delete");
        return Err(AppError::new(ErrorCode::CannotModifyAdminRole));
    }

    state.store.delete_role(&id).await?;
    tracing::info!(role_id = %id, by = %caller.username, "Role deleted");

    Ok(Json(true))
}

fn checked_capability(bits: u32) -> AppResult<Capability> {
    Capability::try_from_bits(bits)
        .map_err(|e| AppError::with_message(ErrorCode::CapabilityOutOfRange, e.to_string()))
}

async fn find_role(state: &ServerState, id: &str) -> AppResult<Role> {
    state
        .store
        .get_role(id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::RoleNotFound, format!("Role {} not found", id)))
}

/// 409 when another role already uses `name`
async fn ensure_name_free(state: &ServerState, name: &str, except_id: Option<&str>) -> AppResult<()> {
    let taken = state
        .store
        .list_roles()
        .await?
        .iter()
        .any(|r| r.name == name && Some(r.id.as_str()) != except_id);
    if taken {
        return Err(AppError::conflict(
            ErrorCode::RoleNameExists,
            format!("Role name {} already exists", name),
        ));
    }
    Ok(())
}

fn protected_role_denied(caller: &CurrentUser, role: &str, action: &str) {
    security_log!(
        "WARN",
        "protected_role_mutation",
        caller = caller.username.as_str(),
        target = role,
        action = action
    );
}
