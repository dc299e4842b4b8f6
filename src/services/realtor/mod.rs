//! Realtor.com search and sale listing details.

pub mod defaults;
pub mod details;
mod query;

pub use details::{LoanRequest, Sale, lazy_scrape_listings, scrape_listing, scrape_listings};
pub use query::{
    Coordinate, County, FilterPreset, Query, ResultAddress, ResultDescription, ResultLocation,
    SearchResult, SearchResults, SortBy, parse_results,
};
