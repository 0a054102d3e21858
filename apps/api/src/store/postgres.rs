use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::errors::StoreError;
use crate::models::geo::SlugStamp;
use crate::models::listing::ListingRow;
use crate::reset::ProfileTable;
use crate::store::{ListingStore, Page};
use crate::tiers::flags::SyncTarget;

const LISTING_COLUMNS: &str = "id, user_id, title, slug, phone, price, member_type, is_active, \
     is_featured, is_premium, is_vip, created_at, updated_at";

/// `ListingStore` backed by the hosted PostgreSQL database.
#[derive(Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn list_active_listings(
        &self,
        page: Option<Page>,
    ) -> Result<Vec<ListingRow>, StoreError> {
        let base = format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE is_active ORDER BY created_at DESC, id"
        );
        let rows = match page {
            Some(Page { limit, offset }) => {
                sqlx::query_as::<_, ListingRow>(&format!("{base} LIMIT $1 OFFSET $2"))
                    .bind(i64::from(limit))
                    .bind(i64::from(offset))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, ListingRow>(&base)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        debug!("Fetched {} active listings", rows.len());
        Ok(rows)
    }

    async fn active_city_slugs(&self) -> Result<Vec<SlugStamp>, StoreError> {
        Ok(sqlx::query_as::<_, SlugStamp>(
            "SELECT slug, updated_at FROM cities WHERE is_active ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn category_slugs(&self) -> Result<Vec<SlugStamp>, StoreError> {
        Ok(
            sqlx::query_as::<_, SlugStamp>("SELECT slug, updated_at FROM categories ORDER BY slug")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn active_listing_slugs(&self) -> Result<Vec<SlugStamp>, StoreError> {
        Ok(sqlx::query_as::<_, SlugStamp>(
            "SELECT slug, updated_at FROM listings WHERE is_active ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn sync_tier_flags(&self, target: SyncTarget) -> Result<u64, StoreError> {
        // Procedure names come from a closed enum, never from input.
        let changed: Option<i64> =
            sqlx::query_scalar(&format!("SELECT {}()", target.procedure()))
                .fetch_one(&self.pool)
                .await?;
        Ok(u64::try_from(changed.unwrap_or(0)).unwrap_or(0))
    }

    async fn delete_profile_rows(&self, table: ProfileTable) -> Result<u64, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {}", table.table_name()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
