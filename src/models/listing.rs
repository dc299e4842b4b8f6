//! Flat listing record shared by every source.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Website a listing was scraped from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Zillow,
    Realtor,
    LandWatch,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Zillow => "zillow",
            Source::Realtor => "realtor",
            Source::LandWatch => "landwatch",
        };
        f.write_str(name)
    }
}

/// What kind of offer a listing represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    ForSale,
    ForRent,
    Auction,
    Sold,
    Other,
}

impl ListingType {
    /// Map a site status string (`FOR_SALE`, `for_rent`, `sold`, ...) to a listing type.
    pub fn from_status(status: &str) -> Self {
        let status = status.to_ascii_lowercase();
        match status.as_str() {
            "for_sale" | "ready_to_build" | "pending" | "contingent" | "coming_soon" => {
                ListingType::ForSale
            }
            "for_rent" => ListingType::ForRent,
            "auction" => ListingType::Auction,
            "sold" | "recently_sold" | "off_market" => ListingType::Sold,
            _ => ListingType::Other,
        }
    }
}

/// A single real-estate listing, flattened to the fields every source has.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    /// Site the listing came from
    pub source: Source,

    /// Sale, rent, auction, ...
    pub listing_type: ListingType,

    /// Absolute URL of the listing page
    pub url: String,

    /// Street address line (may be empty when the site withholds it)
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,

    /// Asking price, or monthly rent for rentals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interior_sqft: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_sqft: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Listing {
    /// Create a listing with only the identifying fields set.
    pub fn new(source: Source, listing_type: ListingType, url: impl Into<String>) -> Self {
        Self {
            source,
            listing_type,
            url: url.into(),
            address: String::new(),
            city: None,
            state: None,
            zip: None,
            price: None,
            property_type: None,
            bedrooms: None,
            bathrooms: None,
            interior_sqft: None,
            lot_sqft: None,
            latitude: None,
            longitude: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_type_from_status() {
        assert_eq!(ListingType::from_status("FOR_SALE"), ListingType::ForSale);
        assert_eq!(ListingType::from_status("for_rent"), ListingType::ForRent);
        assert_eq!(ListingType::from_status("sold"), ListingType::Sold);
        assert_eq!(ListingType::from_status("whatever"), ListingType::Other);
    }

    #[test]
    fn test_serialize_skips_missing_fields() {
        let listing = Listing::new(
            Source::LandWatch,
            ListingType::ForSale,
            "https://www.landwatch.com/x",
        );
        let json = serde_json::to_value(&listing).unwrap();

        assert_eq!(json["source"], "landwatch");
        assert_eq!(json["listing_type"], "for_sale");
        assert!(json.get("price").is_none());
    }
}
