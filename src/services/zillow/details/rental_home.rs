//! Single homes listed for rent.

use scraper::Html;
use serde::Serialize;

use super::home::{FeeAndDue, HomeDetails};
use crate::error::Result;
use crate::models::{Listing, ListingType};

/// A Zillow rental home listing.
#[derive(Debug, Clone, Serialize)]
pub struct RentalHome {
    pub home: HomeDetails,
}

impl RentalHome {
    pub fn from_document(url: &str, document: &Html) -> Result<Self> {
        Ok(Self {
            home: HomeDetails::from_document(url, document)?,
        })
    }

    pub fn fees_and_dues(&self) -> &[FeeAndDue] {
        &self.home.property.reso_facts.fees_and_dues
    }

    pub fn to_listing(&self) -> Listing {
        self.home.to_listing(ListingType::ForRent)
    }
}
