//! Zillow listing detail pages.
//!
//! A search result links to one of three page layouts: a sale home, a
//! rental home, or an apartment building. [`scrape_listing`] picks the
//! parser from the listing status and the shape of the detail URL.

mod home;
pub mod page;
mod rental_apartment;
mod rental_home;
mod sale;

use std::fmt;
use std::str::FromStr;

use reqwest::blocking::Client;
use serde::Serialize;

pub use home::{
    Address, AtAGlanceFact, FeeAndDue, HomeDetails, HomeInsight, Insight, MortgageRates, PriceEvent,
    Property, ResoFacts, TaxRecord,
};
pub use rental_apartment::{AmenityDetails, Building, BuildingAttributes, Floorplan, RentalApartment};
pub use rental_home::RentalHome;
pub use sale::{CostOptions, Sale};

use super::SearchResult;
use super::defaults::BASE_URL;
use crate::error::{AppError, Result};
use crate::models::{Listing, ScrapeConfig};
use crate::services::batch::{LazyListings, scrape_all};
use crate::utils::resolve;

/// Listing status accepted by [`scrape_listing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusType {
    ForSale,
    ForRent,
}

impl FromStr for StatusType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FOR_SALE" => Ok(StatusType::ForSale),
            "FOR_RENT" => Ok(StatusType::ForRent),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusType::ForSale => "FOR_SALE",
            StatusType::ForRent => "FOR_RENT",
        })
    }
}

/// Which parser a detail URL needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Sale(String),
    RentalHome(String),
    RentalApartment(String),
}

/// Decide the page layout without fetching anything.
///
/// Apartment URLs come back relative from search and are resolved against
/// zillow.com.
pub fn classify(detail_url: &str, status: StatusType) -> Result<PageKind> {
    match status {
        StatusType::ForSale => Ok(PageKind::Sale(detail_url.to_string())),
        StatusType::ForRent if detail_url.contains("homedetails") => {
            Ok(PageKind::RentalHome(detail_url.to_string()))
        }
        StatusType::ForRent if detail_url.contains("/b/") => resolve(BASE_URL, detail_url)
            .map(PageKind::RentalApartment)
            .ok_or_else(|| AppError::UnsupportedUrl(detail_url.to_string())),
        StatusType::ForRent => Err(AppError::UnsupportedUrl(detail_url.to_string())),
    }
}

/// A scraped Zillow listing of any layout.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZillowListing {
    Sale(Sale),
    RentalHome(RentalHome),
    RentalApartment(RentalApartment),
}

impl ZillowListing {
    pub fn url(&self) -> &str {
        match self {
            ZillowListing::Sale(sale) => &sale.home.url,
            ZillowListing::RentalHome(rental) => &rental.home.url,
            ZillowListing::RentalApartment(apartment) => &apartment.url,
        }
    }

    pub fn to_listing(&self) -> Listing {
        match self {
            ZillowListing::Sale(sale) => sale.to_listing(),
            ZillowListing::RentalHome(rental) => rental.to_listing(),
            ZillowListing::RentalApartment(apartment) => apartment.to_listing(),
        }
    }
}

/// Fetch and parse one listing.
pub fn scrape_listing(client: &Client, detail_url: &str, status: StatusType) -> Result<ZillowListing> {
    let kind = classify(detail_url, status)?;
    log::debug!("Scraping {kind:?}");

    Ok(match kind {
        PageKind::Sale(url) => {
            let document = page::get_page(client, &url)?;
            ZillowListing::Sale(Sale::from_document(&url, &document)?)
        }
        PageKind::RentalHome(url) => {
            let document = page::get_page(client, &url)?;
            ZillowListing::RentalHome(RentalHome::from_document(&url, &document)?)
        }
        PageKind::RentalApartment(url) => {
            let document = page::get_page(client, &url)?;
            ZillowListing::RentalApartment(RentalApartment::from_document(&url, &document)?)
        }
    })
}

/// Scrape the listing behind a search result.
pub fn scrape_result(client: &Client, result: &SearchResult) -> Result<ZillowListing> {
    let status = result.status_type.parse()?;
    scrape_listing(client, &result.detail_url, status)
}

/// Scrape every search result, pausing between fetches.
pub fn scrape_listings(
    client: &Client,
    results: &[SearchResult],
    config: &ScrapeConfig,
) -> Result<Vec<ZillowListing>> {
    scrape_all(client, results, config, scrape_result)
}

/// Wrap search results so each listing is scraped only when accessed.
pub fn lazy_scrape_listings(
    client: &Client,
    results: Vec<SearchResult>,
) -> LazyListings<'_, SearchResult, ZillowListing> {
    LazyListings::new(client, results, scrape_result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_client;

    #[test]
    fn test_status_type_parse() {
        assert_eq!("FOR_SALE".parse::<StatusType>().unwrap(), StatusType::ForSale);
        assert_eq!("FOR_RENT".parse::<StatusType>().unwrap(), StatusType::ForRent);
        let err = "SOLD".parse::<StatusType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Status type should be either FOR_RENT or FOR_SALE, was SOLD"
        );
        assert_eq!(StatusType::ForRent.to_string(), "FOR_RENT");
    }

    #[test]
    fn test_classify() {
        let home = "https://www.zillow.com/homedetails/1-Main-St/123_zpid/";
        assert_eq!(
            classify(home, StatusType::ForSale).unwrap(),
            PageKind::Sale(home.to_string())
        );
        assert_eq!(
            classify(home, StatusType::ForRent).unwrap(),
            PageKind::RentalHome(home.to_string())
        );
        assert_eq!(
            classify("/b/riverside-lofts-grand-rapids-mi-5XjR4t/", StatusType::ForRent).unwrap(),
            PageKind::RentalApartment(
                "https://www.zillow.com/b/riverside-lofts-grand-rapids-mi-5XjR4t/".to_string()
            )
        );
        assert!(matches!(
            classify("https://www.zillow.com/community/x/", StatusType::ForRent),
            Err(AppError::UnsupportedUrl(_))
        ));
    }

    #[test]
    fn test_invalid_status_fails_before_fetching() {
        let client = create_client(&HttpConfig::default()).unwrap();
        let result: SearchResult = serde_json::from_value(json!({
            "zpid": "1",
            "detailUrl": "https://www.zillow.com/homedetails/1_zpid/",
            "statusType": "SOLD",
        }))
        .unwrap();
        assert!(matches!(
            scrape_result(&client, &result),
            Err(AppError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_lazy_is_unfetched() {
        let client = create_client(&HttpConfig::default()).unwrap();
        let lazy = lazy_scrape_listings(&client, Vec::new());
        assert!(lazy.is_empty());
        assert!(lazy.get(0).is_none());
    }
}
