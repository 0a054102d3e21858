pub mod geo;
pub mod listing;
pub mod membership;
