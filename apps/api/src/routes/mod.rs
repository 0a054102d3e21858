pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::listings::handlers as listings;
use crate::middleware::admin_auth::require_admin_token;
use crate::reset::handlers as reset;
use crate::sitemap::handlers as sitemap;
use crate::state::AppState;
use crate::tiers::handlers as tiers;

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/listings", get(listings::handle_list_active_listings))
        .route("/sync-featured", post(tiers::handle_sync_featured))
        .route("/sync-premium-vip", post(tiers::handle_sync_premium_vip))
        .route("/reset", post(reset::handle_reset))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_token,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sitemap", get(sitemap::handle_sitemap))
        .nest("/api/v1/admin", admin)
        .with_state(state)
}
