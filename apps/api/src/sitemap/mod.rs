//! Sitemap aggregation: fixed static routes plus one entry per active city, category
//! and active listing.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::geo::SlugStamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Path, change frequency, priority.
pub const STATIC_ROUTES: [(&str, ChangeFrequency, f32); 6] = [
    ("", ChangeFrequency::Daily, 1.0),
    ("/listings", ChangeFrequency::Daily, 0.9),
    ("/cities", ChangeFrequency::Weekly, 0.7),
    ("/categories", ChangeFrequency::Weekly, 0.7),
    ("/about", ChangeFrequency::Monthly, 0.3),
    ("/contact", ChangeFrequency::Monthly, 0.3),
];

/// Each dynamic section's URL prefix, change frequency and priority.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub prefix: &'static str,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

pub const CITIES: Section = Section {
    prefix: "/cities",
    change_frequency: ChangeFrequency::Weekly,
    priority: 0.8,
};

pub const CATEGORIES: Section = Section {
    prefix: "/categories",
    change_frequency: ChangeFrequency::Weekly,
    priority: 0.8,
};

pub const LISTINGS: Section = Section {
    prefix: "/listings",
    change_frequency: ChangeFrequency::Monthly,
    priority: 0.6,
};

/// Builds the full entry list. Callers pass only active cities and listings; every
/// category is included. Any section may be empty.
pub fn build_sitemap(
    base_url: &str,
    generated_at: DateTime<Utc>,
    cities: &[SlugStamp],
    categories: &[SlugStamp],
    listings: &[SlugStamp],
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let mut entries = Vec::with_capacity(
        STATIC_ROUTES.len() + cities.len() + categories.len() + listings.len(),
    );

    entries.extend(
        STATIC_ROUTES
            .iter()
            .map(|(path, change_frequency, priority)| SitemapEntry {
                url: format!("{base}{path}"),
                last_modified: generated_at,
                change_frequency: *change_frequency,
                priority: *priority,
            }),
    );

    for (section, rows) in [(CITIES, cities), (CATEGORIES, categories), (LISTINGS, listings)] {
        entries.extend(rows.iter().map(|row| SitemapEntry {
            url: format!("{base}{}/{}", section.prefix, row.slug),
            last_modified: row.updated_at,
            change_frequency: section.change_frequency,
            priority: section.priority,
        }));
    }

    entries
}
