// src/models/mod.rs

//! Domain models shared across sources.

mod config;
mod listing;

pub use config::{Config, HttpConfig, ScrapeConfig};
pub use listing::{Listing, ListingType, Source};
