//! Tier classification and sync orchestration.
//!
//! `is_featured`, `is_premium` and `is_vip` on a listing are derived from the owner's
//! current memberships. The database routines `sync_featured_status()` and
//! `sync_premium_vip_status()` are the only writers of those columns; this module
//! triggers them and reports the outcome.

pub mod flags;
pub mod handlers;
pub mod sync;
