//! In-memory `ListingStore` for tests. Mirrors the database's behaviour: the sync
//! routines apply `derive_flags`, and `profiles` rows cannot be deleted while a role
//! row still references them.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::geo::{CategoryRow, CityRow, SlugStamp};
use crate::models::listing::ListingRow;
use crate::models::membership::MembershipRow;
use crate::reset::ProfileTable;
use crate::store::{ListingStore, Page};
use crate::tiers::flags::{derive_flags, SyncTarget};

#[derive(Debug, Clone)]
struct RoleRow {
    profile_id: Uuid,
    #[allow(dead_code)]
    city_id: Option<Uuid>,
}

#[derive(Default)]
struct State {
    listings: Vec<ListingRow>,
    cities: Vec<CityRow>,
    categories: Vec<CategoryRow>,
    memberships: Vec<MembershipRow>,
    profiles: Vec<Uuid>,
    roles: HashMap<ProfileTable, Vec<RoleRow>>,
    deleted_tables: Vec<ProfileTable>,
    failures: HashMap<String, StoreError>,
    flag_writes: u64,
}

#[derive(Default)]
pub struct MemoryListingStore {
    state: Mutex<State>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an active, untiered listing created `age_minutes` ago.
    pub fn add_listing(&self, slug: &str, owner: Uuid, age_minutes: i64) -> Uuid {
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        let id = Uuid::new_v4();
        self.state.lock().unwrap().listings.push(ListingRow {
            id,
            user_id: owner,
            title: format!("Listing {slug}"),
            slug: slug.to_string(),
            phone: Some("+4790000000".to_string()),
            price: Some(1500.0),
            member_type: Some("member".to_string()),
            is_active: true,
            is_featured: false,
            is_premium: false,
            is_vip: false,
            created_at,
            updated_at: created_at,
        });
        id
    }

    pub fn set_active(&self, listing_id: Uuid, active: bool) {
        let mut state = self.state.lock().unwrap();
        if let Some(listing) = state.listings.iter_mut().find(|l| l.id == listing_id) {
            listing.is_active = active;
        }
    }

    pub fn listing(&self, listing_id: Uuid) -> Option<ListingRow> {
        let state = self.state.lock().unwrap();
        state.listings.iter().find(|l| l.id == listing_id).cloned()
    }

    pub fn add_membership(
        &self,
        user_id: Uuid,
        tier: &str,
        starts_at: DateTime<Utc>,
        ends_at: Option<DateTime<Utc>>,
    ) {
        self.state.lock().unwrap().memberships.push(MembershipRow {
            id: Uuid::new_v4(),
            user_id,
            tier: tier.to_string(),
            starts_at,
            ends_at,
        });
    }

    pub fn add_city(&self, slug: &str, active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().cities.push(CityRow {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
            is_active: active,
            updated_at: Utc::now(),
        });
        id
    }

    pub fn add_category(&self, slug: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().categories.push(CategoryRow {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
            updated_at: Utc::now(),
        });
        id
    }

    /// Inserts a profile plus one row in the given role table pointing at it.
    pub fn add_profile_with_role(&self, table: ProfileTable, city_id: Option<Uuid>) -> Uuid {
        let profile_id = Uuid::new_v4();
        let mut state = self.state.lock().unwrap();
        state.profiles.push(profile_id);
        if table != ProfileTable::Profiles {
            state
                .roles
                .entry(table)
                .or_default()
                .push(RoleRow { profile_id, city_id });
        }
        profile_id
    }

    pub fn profile_count(&self) -> usize {
        self.state.lock().unwrap().profiles.len()
    }

    pub fn deleted_tables(&self) -> Vec<ProfileTable> {
        self.state.lock().unwrap().deleted_tables.clone()
    }

    /// Total number of listing rows whose flags have been rewritten so far.
    pub fn flag_writes(&self) -> u64 {
        self.state.lock().unwrap().flag_writes
    }

    /// Makes `op` (optionally qualified, e.g. `delete_profile_rows:agencies`) fail with `err`.
    pub fn fail_op(&self, op: &str, err: StoreError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op.to_string(), err);
    }

    fn check(&self, op: &str, qualifier: Option<&str>) -> Result<(), StoreError> {
        let state = self.state.lock().unwrap();
        let qualified = qualifier.map(|q| format!("{op}:{q}"));
        if let Some(err) = qualified.and_then(|key| state.failures.get(&key).cloned()) {
            return Err(err);
        }
        match state.failures.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn active_listings_sorted(state: &State) -> Vec<ListingRow> {
        let mut rows: Vec<ListingRow> =
            state.listings.iter().filter(|l| l.is_active).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        rows
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn list_active_listings(
        &self,
        page: Option<Page>,
    ) -> Result<Vec<ListingRow>, StoreError> {
        self.check("list_active_listings", None)?;
        let state = self.state.lock().unwrap();
        let rows = Self::active_listings_sorted(&state);
        Ok(match page {
            Some(Page { limit, offset }) => rows
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect(),
            None => rows,
        })
    }

    async fn active_city_slugs(&self) -> Result<Vec<SlugStamp>, StoreError> {
        self.check("active_city_slugs", None)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .cities
            .iter()
            .filter(|c| c.is_active)
            .map(|c| SlugStamp {
                slug: c.slug.clone(),
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn category_slugs(&self) -> Result<Vec<SlugStamp>, StoreError> {
        self.check("category_slugs", None)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .iter()
            .map(|c| SlugStamp {
                slug: c.slug.clone(),
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn active_listing_slugs(&self) -> Result<Vec<SlugStamp>, StoreError> {
        self.check("active_listing_slugs", None)?;
        let state = self.state.lock().unwrap();
        Ok(Self::active_listings_sorted(&state)
            .into_iter()
            .map(|l| SlugStamp {
                slug: l.slug,
                updated_at: l.updated_at,
            })
            .collect())
    }

    async fn sync_tier_flags(&self, target: SyncTarget) -> Result<u64, StoreError> {
        self.check("sync_tier_flags", Some(target.procedure()))?;
        let now = Utc::now();
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;

        let mut changed = 0;
        for listing in state.listings.iter_mut() {
            let owned: Vec<MembershipRow> = state
                .memberships
                .iter()
                .filter(|m| m.user_id == listing.user_id)
                .cloned()
                .collect();
            let current = listing.flags();
            let next = target.apply(current, derive_flags(&owned, now));
            if next != current {
                listing.is_featured = next.is_featured;
                listing.is_premium = next.is_premium;
                listing.is_vip = next.is_vip;
                listing.updated_at = now;
                changed += 1;
            }
        }
        state.flag_writes += changed;
        Ok(changed)
    }

    async fn delete_profile_rows(&self, table: ProfileTable) -> Result<u64, StoreError> {
        self.check("delete_profile_rows", Some(table.table_name()))?;
        let mut state = self.state.lock().unwrap();

        let deleted = if table == ProfileTable::Profiles {
            let referenced = state
                .roles
                .values()
                .flatten()
                .any(|role| state.profiles.contains(&role.profile_id));
            if referenced {
                return Err(StoreError::Rejected {
                    code: Some("23503".to_string()),
                    detail: "update or delete on table \"profiles\" violates foreign key constraint"
                        .to_string(),
                });
            }
            let count = state.profiles.len() as u64;
            state.profiles.clear();
            count
        } else {
            state.roles.remove(&table).map_or(0, |rows| rows.len() as u64)
        };

        state.deleted_tables.push(table);
        Ok(deleted)
    }
}
