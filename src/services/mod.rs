//! Site clients.
//!
//! Each site module has the same shape: a `Query` builder for the search
//! request, `get_response` / `get_results` to run it, and `scrape_listing`,
//! `scrape_listings` and `lazy_scrape_listings` for listing details.
//! - `zillow`: sale homes, rental homes and apartment buildings
//! - `realtor`: sale listings plus noise, loan and risk lookups
//! - `landwatch`: land listings

pub mod batch;
pub mod landwatch;
pub mod realtor;
pub mod zillow;
