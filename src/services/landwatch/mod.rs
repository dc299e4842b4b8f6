//! LandWatch search and listing details.

pub mod defaults;
pub mod details;
mod query;

pub use details::{
    LazyListingDetails, ListingDetails, check_property_result_keys, lazy_scrape_listings,
    scrape_listing, scrape_listings,
};
pub use query::{PropertyResult, PropertyType, Query, SaleType, parse_results};
