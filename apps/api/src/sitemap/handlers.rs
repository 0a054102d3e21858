use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::errors::StoreError;
use crate::models::geo::SlugStamp;
use crate::sitemap::{build_sitemap, SitemapEntry};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SitemapResponse {
    pub data: Vec<SitemapEntry>,
}

/// A failed section is logged and contributes nothing; the rest of the sitemap still renders.
fn or_skip(section: &str, result: Result<Vec<SlugStamp>, StoreError>) -> Vec<SlugStamp> {
    result.unwrap_or_else(|e| {
        warn!("Sitemap section '{section}' skipped: {e}");
        Vec::new()
    })
}

/// GET /api/v1/sitemap
pub async fn handle_sitemap(State(state): State<AppState>) -> Json<SitemapResponse> {
    let (cities, categories, listings) = tokio::join!(
        state.store.active_city_slugs(),
        state.store.category_slugs(),
        state.store.active_listing_slugs(),
    );

    let data = build_sitemap(
        &state.config.site_url,
        Utc::now(),
        &or_skip("cities", cities),
        &or_skip("categories", categories),
        &or_skip("listings", listings),
    );

    Json(SitemapResponse { data })
}
