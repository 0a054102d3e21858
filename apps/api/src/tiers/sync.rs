use serde::Serialize;
use tracing::{error, info};

use crate::errors::StoreError;
use crate::store::ListingStore;
use crate::tiers::flags::SyncTarget;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome {
    pub target: SyncTarget,
    pub rows_changed: u64,
    pub message: String,
}

/// Triggers the recomputation routine for `target` once. No retry: a failure is
/// logged and handed back to the caller unchanged.
pub async fn run_sync(
    store: &dyn ListingStore,
    target: SyncTarget,
) -> Result<SyncOutcome, StoreError> {
    info!("Running {}()", target.procedure());

    let rows_changed = store.sync_tier_flags(target).await.map_err(|e| {
        error!("{}() failed: {e}", target.procedure());
        e
    })?;

    info!(
        "{}() finished: {rows_changed} listings changed",
        target.procedure()
    );

    Ok(SyncOutcome {
        target,
        rows_changed,
        message: format!(
            "{} status synced ({rows_changed} listings updated)",
            capitalize(target.label())
        ),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
