use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::listing::ListingSummary;
use crate::state::AppState;
use crate::store::Page;

pub const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct ListingsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListingsQuery {
    /// No `limit` means the full active set; `offset` alone is rejected.
    fn page(&self) -> Result<Option<Page>, AppError> {
        match (self.limit, self.offset) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(AppError::Validation("offset requires limit".to_string())),
            (Some(limit), offset) => {
                if limit == 0 || limit > MAX_PAGE_SIZE {
                    return Err(AppError::Validation(format!(
                        "limit must be between 1 and {MAX_PAGE_SIZE}"
                    )));
                }
                Ok(Some(Page {
                    limit,
                    offset: offset.unwrap_or(0),
                }))
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingsResponse {
    pub data: Vec<ListingSummary>,
}

/// GET /api/v1/admin/listings
///
/// Active listings only, newest first.
pub async fn handle_list_active_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingsQuery>,
) -> Result<Json<ListingsResponse>, AppError> {
    let page = query.page()?;
    let rows = state.store.list_active_listings(page).await?;
    Ok(Json(ListingsResponse {
        data: rows.into_iter().map(ListingSummary::from).collect(),
    }))
}
