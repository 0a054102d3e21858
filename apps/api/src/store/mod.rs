//! Persistence seam. Handlers only see `ListingStore`; `AppState` carries it as
//! `Arc<dyn ListingStore>` so tests can swap in the in-memory backend.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::geo::SlugStamp;
use crate::models::listing::ListingRow;
use crate::reset::ProfileTable;
use crate::tiers::flags::SyncTarget;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Boundary pagination for the admin projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Active listings, newest first. `None` returns the full active set.
    async fn list_active_listings(&self, page: Option<Page>)
        -> Result<Vec<ListingRow>, StoreError>;

    async fn active_city_slugs(&self) -> Result<Vec<SlugStamp>, StoreError>;

    /// Every category, active or not.
    async fn category_slugs(&self) -> Result<Vec<SlugStamp>, StoreError>;

    async fn active_listing_slugs(&self) -> Result<Vec<SlugStamp>, StoreError>;

    /// Runs the recomputation routine for `target`, returning how many listings changed.
    async fn sync_tier_flags(&self, target: SyncTarget) -> Result<u64, StoreError>;

    /// Deletes every row of a profile table, returning the number removed.
    async fn delete_profile_rows(&self, table: ProfileTable) -> Result<u64, StoreError>;
}
