use std::sync::Arc;

use crate::config::Config;
use crate::identity::IdentityAdmin;
use crate::store::ListingStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Listing store. Default: `PgListingStore`; tests use the in-memory store.
    pub store: Arc<dyn ListingStore>,
    /// Identity admin API, used only by the account reset.
    pub identities: Arc<dyn IdentityAdmin>,
    pub config: Config,
}
