//! Admin endpoints that trigger tier recomputation.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::tiers::flags::SyncTarget;
use crate::tiers::sync::run_sync;

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub rows_changed: u64,
}

async fn sync(state: &AppState, target: SyncTarget) -> Result<Json<SyncResponse>, AppError> {
    let outcome = run_sync(state.store.as_ref(), target).await?;
    Ok(Json(SyncResponse {
        success: true,
        message: outcome.message,
        rows_changed: outcome.rows_changed,
    }))
}

/// POST /api/v1/admin/sync-featured
pub async fn handle_sync_featured(
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, AppError> {
    sync(&state, SyncTarget::Featured).await
}

/// POST /api/v1/admin/sync-premium-vip
pub async fn handle_sync_premium_vip(
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, AppError> {
    sync(&state, SyncTarget::PremiumVip).await
}
