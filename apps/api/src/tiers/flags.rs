use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::membership::MembershipRow;

/// The three derived booleans stored on a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierFlags {
    pub is_featured: bool,
    pub is_premium: bool,
    pub is_vip: bool,
}

/// Display rank of a listing, highest set flag wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Standard,
    Featured,
    Premium,
    Vip,
}

impl TierFlags {
    pub fn tier(&self) -> Tier {
        if self.is_vip {
            Tier::Vip
        } else if self.is_premium {
            Tier::Premium
        } else if self.is_featured {
            Tier::Featured
        } else {
            Tier::Standard
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipTier {
    Featured,
    Premium,
    Vip,
}

impl MembershipTier {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "featured" => Some(MembershipTier::Featured),
            "premium" => Some(MembershipTier::Premium),
            "vip" => Some(MembershipTier::Vip),
            _ => None,
        }
    }
}

/// Which group of flags a sync run recomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTarget {
    Featured,
    /// Premium and VIP share one derivation and are always written together.
    PremiumVip,
}

impl SyncTarget {
    /// Name of the stored routine that performs the recomputation.
    pub fn procedure(&self) -> &'static str {
        match self {
            SyncTarget::Featured => "sync_featured_status",
            SyncTarget::PremiumVip => "sync_premium_vip_status",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncTarget::Featured => "featured",
            SyncTarget::PremiumVip => "premium/VIP",
        }
    }

    /// Copies the flags owned by this target from `derived` onto `current`, leaving the rest.
    pub fn apply(&self, current: TierFlags, derived: TierFlags) -> TierFlags {
        match self {
            SyncTarget::Featured => TierFlags {
                is_featured: derived.is_featured,
                ..current
            },
            SyncTarget::PremiumVip => TierFlags {
                is_premium: derived.is_premium,
                is_vip: derived.is_vip,
                ..current
            },
        }
    }
}

/// Derives the flags an owner's listings should carry at `now`.
///
/// Featured is independent. Premium and VIP come from the highest current paid tier,
/// so at most one of them is set. Rows with an unknown tier string are ignored.
pub fn derive_flags(memberships: &[MembershipRow], now: DateTime<Utc>) -> TierFlags {
    let current: Vec<MembershipTier> = memberships
        .iter()
        .filter(|m| m.is_current(now))
        .filter_map(|m| MembershipTier::parse(&m.tier))
        .collect();

    let has = |tier: MembershipTier| current.contains(&tier);
    let is_vip = has(MembershipTier::Vip);

    TierFlags {
        is_featured: has(MembershipTier::Featured),
        is_premium: has(MembershipTier::Premium) && !is_vip,
        is_vip,
    }
}
