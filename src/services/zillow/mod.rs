//! Zillow search and listing details.

pub mod defaults;
pub mod details;
mod query;

pub use details::{StatusType, ZillowListing, lazy_scrape_listings, scrape_listing, scrape_listings};
pub use query::{FilterPreset, HomeType, LatLong, MapBounds, Query, SearchResult, parse_results};
