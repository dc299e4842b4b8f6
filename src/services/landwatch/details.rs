//! LandWatch listing details.
//!
//! Search results already carry every listing field, so scraping is a
//! validation and conversion step with no network access.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::defaults::ROOT_URL;
use super::query::PropertyResult;
use crate::error::{AppError, Result};
use crate::models::{Listing, ListingType, Source};
use crate::utils::units::acres_to_sqft;

/// Keys every property result is expected to carry.
pub const EXPECTED_KEYS: &[&str] = &[
    "accountId", "acres", "acresDisplay", "adTargetingCountyId", "address", "auctionDate",
    "baths", "bathsDisplay", "bedsDisplay", "beds", "brokerCompany", "brokerName",
    "canonicalUrl", "city", "cityID", "companyLogoDocumentId", "county", "countyId",
    "countyLabel", "description", "encodedBoundaryPoints", "externalSourceId", "halfBaths",
    "halfBathsDisplay", "hasHouse", "hasVideo", "hasVirtualTour", "homesqft", "homesqftDisplay",
    "imageCount", "imageAltTextDisplay", "id", "isALC", "isDiamond", "isFirstFreeListing",
    "isGold", "isHeadlineAd", "isLiked", "isPlatinum", "isShowcase", "lake", "latitude",
    "listHubListingKey", "listingLevel", "listingLevelTitle", "longitude", "partnerId",
    "portraitDocumentId", "price", "priceChange", "priceDisplay", "propertyTypes",
    "propertyTypesLabel", "schemaData", "shortPrice", "siteListingId", "state",
    "stateAbbreviation", "stateCode", "stateId", "status", "thumbnailDocumentId", "title",
    "types", "zip",
];

/// Fail with every expected key the result lacks. Extra keys are fine.
pub fn check_property_result_keys(result: &PropertyResult) -> Result<()> {
    let missing: Vec<String> = EXPECTED_KEYS
        .iter()
        .filter(|key| !result.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingKeys { keys: missing })
    }
}

/// A LandWatch listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetails {
    pub price: Option<f64>,
    pub acres: Option<f64>,
    /// Interior sqft of the house, if any
    #[serde(rename = "homesqft")]
    pub sqft: Option<f64>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub zip: Option<String>,
    pub lake: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub auction_date: Option<String>,

    pub description: Option<String>,
    pub has_house: Option<bool>,
    pub has_video: Option<bool>,
    pub has_virtual_tour: Option<bool>,
    #[serde(rename = "propertyTypesLabel")]
    pub labels: Option<String>,

    pub baths: Option<f64>,
    pub half_baths: Option<f64>,
    pub beds: Option<f64>,

    pub broker_company: Option<String>,
    pub broker_name: Option<String>,

    /// Listing path relative to the site root
    pub canonical_url: String,
}

impl ListingDetails {
    pub fn from_result(result: &PropertyResult) -> Result<Self> {
        check_property_result_keys(result)?;
        ListingDetails::deserialize(Value::Object(result.clone()))
            .map_err(|e| AppError::shape("landwatch property result", e))
    }

    /// Absolute listing URL.
    pub fn url(&self) -> String {
        format!("{ROOT_URL}{}", self.canonical_url)
    }

    pub fn lot_sqft(&self) -> Option<f64> {
        self.acres.map(acres_to_sqft)
    }

    pub fn to_listing(&self) -> Listing {
        let listing_type = if self.auction_date.as_deref().is_some_and(|d| !d.is_empty()) {
            ListingType::Auction
        } else {
            ListingType::ForSale
        };

        let mut listing = Listing::new(Source::LandWatch, listing_type, self.url());
        listing.address = self.address.clone().unwrap_or_default();
        listing.city = self.city.clone();
        listing.state = self.state_code.clone().or_else(|| self.state.clone());
        listing.zip = self.zip.clone();
        listing.price = self.price;
        listing.property_type = self.labels.clone();
        listing.bedrooms = self.beds;
        listing.bathrooms = self
            .baths
            .map(|full| full + self.half_baths.unwrap_or(0.0) * 0.5);
        listing.interior_sqft = self.sqft.filter(|sqft| *sqft > 0.0);
        listing.lot_sqft = self.lot_sqft();
        listing.latitude = self.latitude;
        listing.longitude = self.longitude;
        listing
    }
}

/// Validate and convert one property result.
pub fn scrape_listing(result: &PropertyResult) -> Result<ListingDetails> {
    ListingDetails::from_result(result)
}

/// Convert every property result, stopping at the first invalid one.
pub fn scrape_listings(results: &[PropertyResult]) -> Result<Vec<ListingDetails>> {
    let total = results.len();
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let details = scrape_listing(result)?;
            log::info!("Parsed {} of {}", i + 1, total);
            Ok(details)
        })
        .collect()
}

/// Property results converted one at a time as they are accessed.
#[derive(Debug, Clone)]
pub struct LazyListingDetails {
    results: Vec<PropertyResult>,
}

impl LazyListingDetails {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[PropertyResult] {
        &self.results
    }

    pub fn get(&self, index: usize) -> Option<Result<ListingDetails>> {
        self.results.get(index).map(scrape_listing)
    }

    /// A fresh iterator; each call starts from the first result.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Result<ListingDetails>> + '_ {
        self.results.iter().map(scrape_listing)
    }
}

pub fn lazy_scrape_listings(results: Vec<PropertyResult>) -> LazyListingDetails {
    LazyListingDetails { results }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn result() -> PropertyResult {
        let mut result: PropertyResult = EXPECTED_KEYS
            .iter()
            .map(|key| (key.to_string(), Value::Null))
            .collect();
        let filled = json!({
            "id": 41234567,
            "price": 125000,
            "acres": 20.5,
            "homesqft": 0,
            "address": "0 County Road 12",
            "city": "Sparta",
            "county": "White",
            "state": "Tennessee",
            "stateCode": "TN",
            "zip": "38583",
            "latitude": 35.92,
            "longitude": -85.46,
            "auctionDate": null,
            "description": "Wooded acreage with creek.",
            "hasHouse": false,
            "hasVideo": true,
            "hasVirtualTour": false,
            "propertyTypesLabel": "Recreational Property, Hunting Property",
            "beds": 0,
            "baths": 0,
            "halfBaths": 0,
            "brokerCompany": "Acme Land",
            "brokerName": "Pat Doe",
            "canonicalUrl": "/white-county-tennessee-recreational-property-for-sale/pid/41234567",
            "extraKey": "ignored",
        });
        if let Value::Object(filled) = filled {
            result.extend(filled);
        }
        result
    }

    #[test]
    fn test_check_keys_reports_missing_only() {
        let mut result = result();
        assert!(check_property_result_keys(&result).is_ok());

        result.remove("price");
        result.remove("zip");
        match check_property_result_keys(&result) {
            Err(AppError::MissingKeys { keys }) => assert_eq!(keys, vec!["price", "zip"]),
            other => panic!("expected MissingKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_keys_message() {
        let mut result = result();
        result.remove("price");
        let err = scrape_listing(&result).unwrap_err();
        assert_eq!(err.to_string(), "Listing is missing the following keys: price");
    }

    #[test]
    fn test_from_result() {
        let details = scrape_listing(&result()).unwrap();
        assert_eq!(details.price, Some(125_000.0));
        assert_eq!(details.state_code.as_deref(), Some("TN"));
        assert_eq!(details.has_video, Some(true));
        assert_eq!(
            details.url(),
            "https://www.landwatch.com/white-county-tennessee-recreational-property-for-sale/pid/41234567"
        );
    }

    #[test]
    fn test_wrong_type_is_error() {
        let mut result = result();
        result.insert("price".into(), json!("lots"));
        assert!(matches!(
            scrape_listing(&result),
            Err(AppError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_to_listing() {
        let listing = scrape_listing(&result()).unwrap().to_listing();
        assert_eq!(listing.source, Source::LandWatch);
        assert_eq!(listing.listing_type, ListingType::ForSale);
        assert_eq!(listing.lot_sqft, Some(acres_to_sqft(20.5)));
        assert_eq!(listing.interior_sqft, None);
        assert_eq!(listing.state.as_deref(), Some("TN"));
    }

    #[test]
    fn test_auction_listing_type() {
        let mut result = result();
        result.insert("auctionDate".into(), json!("2025-06-01"));
        let listing = scrape_listing(&result).unwrap().to_listing();
        assert_eq!(listing.listing_type, ListingType::Auction);
    }

    #[test]
    fn test_eager_and_lazy() {
        let mut bad = result();
        bad.remove("title");
        let results = vec![result(), bad, result()];

        assert!(scrape_listings(&results).is_err());
        assert_eq!(scrape_listings(&results[..1]).unwrap().len(), 1);

        let lazy = lazy_scrape_listings(results);
        assert_eq!(lazy.len(), 3);
        let outcomes: Vec<bool> = lazy.iter().map(|r| r.is_ok()).collect();
        assert_eq!(outcomes, vec![true, false, true]);
        assert_eq!(lazy.iter().count(), 3);
        assert!(lazy.get(3).is_none());
    }
}
