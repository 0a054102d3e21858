//! Admin and public API for the classified-listings platform: tier flag sync,
//! the admin listing projection, sitemap aggregation and the guarded account reset.

pub mod config;
pub mod db;
pub mod errors;
pub mod identity;
pub mod listings;
pub mod middleware;
pub mod models;
pub mod reset;
pub mod routes;
pub mod sitemap;
pub mod state;
pub mod store;
pub mod tiers;
