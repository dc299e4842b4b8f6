//! Pipeline entry points for the command-line front-end.
//!
//! - `run_zillow`: Zillow search, optionally with detail pages
//! - `run_realtor`: Realtor.com search, optionally with detail pages
//! - `run_landwatch`: LandWatch search

pub mod search;

pub use search::{RealtorSearch, ZillowSearch, run_landwatch, run_realtor, run_zillow};
