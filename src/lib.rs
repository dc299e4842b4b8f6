// src/lib.rs

//! Realty listing scrapers for Zillow, Realtor.com and LandWatch.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
pub use models::{Config, Listing, ListingType, Source};
pub use services::{landwatch, realtor, zillow};
