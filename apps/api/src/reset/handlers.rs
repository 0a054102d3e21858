//! POST /api/v1/admin/reset — wipes all accounts. Requires the admin bearer token (route
//! middleware) and a separate `x-reset-token` header matching `RESET_TOKEN`.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::AppError;
use crate::middleware::admin_auth::tokens_match;
use crate::reset::{reset_accounts, ResetReport};
use crate::state::AppState;

pub const RESET_TOKEN_HEADER: &str = "x-reset-token";

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
    pub report: ResetReport,
}

fn authorize_reset(headers: &HeaderMap, configured: Option<&str>) -> Result<(), AppError> {
    let expected = configured.ok_or_else(|| {
        AppError::Forbidden("account reset is disabled on this deployment".to_string())
    })?;

    let provided = headers
        .get(RESET_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided.is_empty() || !tokens_match(provided, expected) {
        warn!("Account reset refused: missing or invalid {RESET_TOKEN_HEADER}");
        return Err(AppError::Forbidden(format!(
            "a valid {RESET_TOKEN_HEADER} header is required"
        )));
    }
    Ok(())
}

pub async fn handle_reset(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ResetResponse>, AppError> {
    authorize_reset(&headers, state.config.reset_token.as_deref())?;

    warn!("Account reset authorized; deleting all profiles and identities");

    let report = reset_accounts(state.store.as_ref(), state.identities.as_ref())
        .await
        .map_err(|failure| {
            error!(
                "Account reset failed at step '{}' after {:?}",
                failure.step, failure.completed
            );
            AppError::Store(failure.source)
        })?;

    Ok(Json(ResetResponse {
        success: true,
        message: format!(
            "Deleted {} profiles and {} identities",
            report.profiles, report.identities
        ),
        report,
    }))
}
