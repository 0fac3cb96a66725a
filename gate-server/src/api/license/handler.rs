use axum::{Json, extract::State};
use shared::models::{License, LicenseImport, LicenseInfo};

use crate::AppError;
use crate::core::ServerState;

/// Summary of the stored license
///
/// 404 when none was imported, 401 when the stored one no longer verifies.
pub async fn current(State(state): State<ServerState>) -> Result<Json<LicenseInfo>, AppError> {
    let license = state
        .store
        .get_license()
        .await?
        .ok_or_else(|| AppError::not_found("license"))?;

    let info = state
        .license_verifier
        .verify(&license.content)
        .map_err(|e| AppError::license_invalid(e.to_string()))?;

    Ok(Json(info))
}

/// Verify, then replace the stored license
///
/// Rejected content leaves the stored license untouched.
pub async fn import(
    State(state): State<ServerState>,
    Json(req): Json<LicenseImport>,
) -> Result<Json<LicenseInfo>, AppError> {
    let info = state
        .license_verifier
        .verify(&req.content)
        .map_err(|e| AppError::validation(format!("License rejected: {}", e)))?;

    state.store.save_license(License::new(req.content)).await?;

    tracing::info!(
        product = %info.product,
        corporation = %info.corporation,
        expires_at = %info.expires_at,
        "License imported"
    );

    Ok(Json(info))
}
