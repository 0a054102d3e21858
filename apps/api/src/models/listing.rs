use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::tiers::flags::{Tier, TierFlags};

/// Full `listings` row. Tier flags are derived state written only by the sync routines.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub phone: Option<String>,
    pub price: Option<f64>,
    /// `member`, `independent_model` or `agency`.
    pub member_type: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_premium: bool,
    pub is_vip: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingRow {
    pub fn flags(&self) -> TierFlags {
        TierFlags {
            is_featured: self.is_featured,
            is_premium: self.is_premium,
            is_vip: self.is_vip,
        }
    }
}

/// Admin display projection of an active listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub phone: Option<String>,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub is_featured: bool,
    pub is_premium: bool,
    pub is_vip: bool,
    pub tier: Tier,
}

impl From<ListingRow> for ListingSummary {
    fn from(row: ListingRow) -> Self {
        let tier = row.flags().tier();
        ListingSummary {
            id: row.id,
            title: row.title,
            slug: row.slug,
            phone: row.phone,
            price: row.price,
            created_at: row.created_at,
            is_featured: row.is_featured,
            is_premium: row.is_premium,
            is_vip: row.is_vip,
            tier,
        }
    }
}
