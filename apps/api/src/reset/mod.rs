//! Administrative account reset. Destructive and irreversible.
//!
//! Profile tables are emptied dependents-first so no foreign key is left dangling,
//! then every identity in the auth service is deleted one at a time.

pub mod handlers;

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::identity::IdentityAdmin;
use crate::store::ListingStore;

/// Identities fetched per enumeration request.
pub const IDENTITY_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileTable {
    Members,
    IndependentModels,
    Agencies,
    Profiles,
}

/// Dependents first: the three role tables reference `profiles`.
pub const RESET_ORDER: [ProfileTable; 4] = [
    ProfileTable::Members,
    ProfileTable::IndependentModels,
    ProfileTable::Agencies,
    ProfileTable::Profiles,
];

impl ProfileTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            ProfileTable::Members => "members",
            ProfileTable::IndependentModels => "independent_models",
            ProfileTable::Agencies => "agencies",
            ProfileTable::Profiles => "profiles",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResetReport {
    pub members: u64,
    pub independent_models: u64,
    pub agencies: u64,
    pub profiles: u64,
    pub identities: u64,
    /// Identities that were already gone when their delete was issued.
    pub identities_missing: u64,
}

impl ResetReport {
    fn record(&mut self, table: ProfileTable, deleted: u64) {
        match table {
            ProfileTable::Members => self.members = deleted,
            ProfileTable::IndependentModels => self.independent_models = deleted,
            ProfileTable::Agencies => self.agencies = deleted,
            ProfileTable::Profiles => self.profiles = deleted,
        }
    }
}

/// A step failure. Steps before `step` have already been applied and are not rolled back.
#[derive(Debug)]
pub struct ResetFailure {
    pub step: &'static str,
    pub completed: ResetReport,
    pub source: StoreError,
}

pub async fn reset_accounts(
    store: &dyn ListingStore,
    identities: &dyn IdentityAdmin,
) -> Result<ResetReport, ResetFailure> {
    let mut report = ResetReport::default();

    for table in RESET_ORDER {
        match store.delete_profile_rows(table).await {
            Ok(deleted) => {
                info!("Reset: deleted {deleted} rows from {}", table.table_name());
                report.record(table, deleted);
            }
            Err(source) => {
                return Err(ResetFailure {
                    step: table.table_name(),
                    completed: report,
                    source,
                })
            }
        }
    }

    if let Err(source) = delete_all_identities(identities, &mut report).await {
        return Err(ResetFailure {
            step: "identities",
            completed: report,
            source,
        });
    }

    info!(
        "Reset complete: {} identities deleted ({} already missing)",
        report.identities, report.identities_missing
    );
    Ok(report)
}

/// Deleting shifts later identities onto earlier pages, so the first page is re-read
/// until it comes back empty. A page made only of ids already handled means the
/// deletes are not taking effect, and the loop stops instead of spinning.
async fn delete_all_identities(
    identities: &dyn IdentityAdmin,
    report: &mut ResetReport,
) -> Result<(), StoreError> {
    let mut handled = HashSet::new();

    loop {
        let page = identities.list_identities(1, IDENTITY_PAGE_SIZE).await?;
        if page.is_empty() {
            return Ok(());
        }

        let fresh: Vec<_> = page
            .into_iter()
            .filter(|identity| handled.insert(identity.id))
            .collect();
        if fresh.is_empty() {
            return Err(StoreError::rejected(
                "identity service keeps listing identities that were already deleted",
            ));
        }

        for identity in fresh {
            match identities.delete_identity(identity.id).await {
                Ok(()) => report.identities += 1,
                Err(StoreError::NotFound(_)) => {
                    warn!("Reset: identity {} already deleted", identity.id);
                    report.identities_missing += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
