//! Realtor.com sale listing pages and the per-property lookup APIs.

use reqwest::blocking::{Client, RequestBuilder};
use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::defaults;
use super::query::{County, ResultAddress, SearchResult};
use crate::error::{AppError, Result};
use crate::models::{Listing, ListingType, ScrapeConfig, Source};
use crate::services::batch::{LazyListings, scrape_all};
use crate::utils::html::script_json;
use crate::utils::http::{fetch_page, header_map, send_json};
use crate::utils::json::{at, null_default, string_or_number, take};

const UNKNOWN_NOISE: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    pub text: Option<String>,
    pub year_built: Option<i32>,
    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub garage: Option<f64>,
    pub sqft: Option<f64>,
    pub lot_sqft: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_default")]
    pub address: ResultAddress,
    #[serde(default)]
    pub county: Option<County>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hoa {
    #[serde(default)]
    pub fee: Option<f64>,
}

/// `props.pageProps.initialState.propertyDetails` of a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    #[serde(deserialize_with = "string_or_number")]
    pub property_id: String,
    #[serde(default)]
    pub listing_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub list_price: Option<f64>,
    #[serde(default)]
    pub price_per_sqft: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub description: Description,
    #[serde(default, deserialize_with = "null_default")]
    pub open_houses: Vec<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub details: Vec<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub location: Location,
    #[serde(default)]
    pub hoa: Option<Hoa>,
    #[serde(default, deserialize_with = "null_default")]
    pub property_history: Vec<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub tax_history: Vec<Value>,
}

/// Inputs to the site's mortgage calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRequest {
    pub home_price: f64,
    pub down_payment: f64,
    pub fips: String,
    pub state_code: String,
    pub yearly_property_tax: f64,
    pub hoa_fee: f64,
}

impl LoanRequest {
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("hoa_fees", self.hoa_fee.to_string()),
            ("fips", self.fips.clone()),
            ("state", self.state_code.clone()),
            ("home_price", self.home_price.to_string()),
            ("down_payment", self.down_payment.to_string()),
            ("veterans_benefits", "false".to_string()),
            ("property_tax", self.yearly_property_tax.to_string()),
            ("is_fees_included", "true".to_string()),
            ("app_name", "realtor_dot_com".to_string()),
            ("app_version", "0.0.1".to_string()),
        ]
    }
}

/// A Realtor.com sale listing.
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    pub url: String,
    pub details: PropertyDetails,
    /// Noise level text, `"Unknown"` until looked up
    pub noise: String,
    /// Untyped `propertyDetails`, for fields not modelled above
    pub raw: Value,
}

impl Sale {
    /// Parse a listing page without any follow-up requests.
    pub fn from_document(url: &str, document: &Html) -> Result<Self> {
        let next_data = script_json(document, "__NEXT_DATA__")?;
        let raw = at(
            &next_data,
            "/props/pageProps/initialState/propertyDetails",
            "realtor listing",
        )?
        .clone();
        let details = take(&raw, "", "realtor propertyDetails")?;
        Ok(Self {
            url: url.to_string(),
            details,
            noise: UNKNOWN_NOISE.to_string(),
            raw,
        })
    }

    pub fn address(&self) -> &ResultAddress {
        &self.details.location.address
    }

    pub fn latitude(&self) -> Option<f64> {
        self.address().coordinate.and_then(|c| c.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.address().coordinate.and_then(|c| c.lon)
    }

    /// `"line, city, ST zip"`
    pub fn street_address(&self) -> String {
        let address = self.address();
        format!(
            "{}, {}, {} {}",
            address.line.as_deref().unwrap_or_default(),
            address.city.as_deref().unwrap_or_default(),
            address.state_code.as_deref().unwrap_or_default(),
            address.postal_code.as_deref().unwrap_or_default(),
        )
    }

    pub fn county(&self) -> Option<&str> {
        self.details.location.county.as_ref()?.name.as_deref()
    }

    pub fn fips(&self) -> Option<&str> {
        self.details.location.county.as_ref()?.fips_code.as_deref()
    }

    pub fn hoa_fee(&self) -> f64 {
        self.details
            .hoa
            .as_ref()
            .and_then(|hoa| hoa.fee)
            .unwrap_or(0.0)
    }

    pub fn yearly_property_tax(&self) -> Option<f64> {
        self.raw.pointer("/source/raw/tax_amount")?.as_f64()
    }

    /// Housing market summary for the listing's postal code.
    pub fn area_market_status(&self) -> Option<&Value> {
        self.raw
            .pointer("/location/postal_code/geo_statistics/housing_market")
            .filter(|v| !v.is_null())
    }

    /// Calculator inputs for this listing. `down` defaults to 20% of the price.
    pub fn loan_request(&self, down: Option<f64>) -> Result<LoanRequest> {
        let price = self
            .details
            .list_price
            .ok_or_else(|| AppError::shape("realtor listing", "no list_price"))?;
        let missing = |field: &str| AppError::shape("realtor listing", format!("no {field}"));

        Ok(LoanRequest {
            home_price: price,
            down_payment: down.unwrap_or_else(|| (price * 0.2).round()),
            fips: self.fips().ok_or_else(|| missing("fips_code"))?.to_string(),
            state_code: self
                .address()
                .state_code
                .clone()
                .ok_or_else(|| missing("state_code"))?,
            yearly_property_tax: self.yearly_property_tax().unwrap_or(0.0),
            hoa_fee: self.hoa_fee(),
        })
    }

    /// Monthly payment estimate from the site's calculator.
    pub fn estimated_monthly_payment(&self, client: &Client, down: Option<f64>) -> Result<f64> {
        let estimates = fetch_loan_estimates(client, &self.loan_request(down)?)?;
        take(&estimates, "/mortgage_data/monthly_payment", "realtor loan estimate")
    }

    pub fn to_listing(&self) -> Listing {
        let details = &self.details;
        let address = self.address();
        let listing_type = details
            .status
            .as_deref()
            .map_or(ListingType::Other, ListingType::from_status);

        let mut listing = Listing::new(Source::Realtor, listing_type, self.url.clone());
        listing.address = address.line.clone().unwrap_or_default();
        listing.city = address.city.clone();
        listing.state = address.state_code.clone().or_else(|| address.state.clone());
        listing.zip = address.postal_code.clone();
        listing.price = details.list_price;
        listing.property_type = details.description.kind.clone();
        listing.bedrooms = details.description.beds;
        listing.bathrooms = details.description.baths;
        listing.interior_sqft = details.description.sqft;
        listing.lot_sqft = details.description.lot_sqft;
        listing.latitude = self.latitude();
        listing.longitude = self.longitude();
        listing
    }
}

pub fn noise_request(client: &Client, latitude: f64, longitude: f64) -> RequestBuilder {
    client.get(defaults::NOISE_URL).query(&[
        ("lat", latitude.to_string()),
        ("lon", longitude.to_string()),
    ])
}

/// Noise metrics (`result` object) around a coordinate.
pub fn fetch_noise_metrics(client: &Client, latitude: f64, longitude: f64) -> Result<Value> {
    let response = send_json(noise_request(client, latitude, longitude))?;
    Ok(at(&response, "/result", "realtor noise")?.clone())
}

/// The `local_text` of noise metrics, `"Unknown"` when absent.
pub fn noise_text(metrics: &Value) -> String {
    metrics
        .get("local_text")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_NOISE)
        .to_string()
}

pub fn loan_estimates_request(client: &Client, request: &LoanRequest) -> RequestBuilder {
    client.get(defaults::LOAN_URL).query(&request.query())
}

/// Mortgage calculator `results`.
pub fn fetch_loan_estimates(client: &Client, request: &LoanRequest) -> Result<Value> {
    let response = send_json(loan_estimates_request(client, request))?;
    Ok(at(&response, "/results", "realtor loan estimate")?.clone())
}

fn hulk_request(client: &Client, payload: &Value) -> Result<RequestBuilder> {
    Ok(client
        .post(defaults::HULK_URL)
        .query(defaults::POST_PARAMS)
        .headers(header_map(defaults::HEADERS)?)
        .json(payload))
}

pub fn flood_risk_request(client: &Client, property_id: &str) -> Result<RequestBuilder> {
    hulk_request(
        client,
        &json!({
            "query": defaults::FLOOD_RISK_QUERY,
            "variables": {"propertyId": property_id},
        }),
    )
}

pub fn fire_risk_request(client: &Client, property_id: &str) -> Result<RequestBuilder> {
    hulk_request(
        client,
        &json!({
            "query": defaults::FIRE_RISK_QUERY,
            "propertyId": property_id,
            "callfrom": "LDP",
            "nrQueryType": "WILDFIRE_RISK",
            "variables": {"propertyId": property_id},
            "isClient": true,
        }),
    )
}

/// Flood risk data (`data` of the GraphQL response).
pub fn fetch_flood_risk(client: &Client, property_id: &str) -> Result<Value> {
    let response = send_json(flood_risk_request(client, property_id)?)?;
    Ok(at(&response, "/data", "realtor flood risk")?.clone())
}

/// Wildfire risk data (`data` of the GraphQL response).
pub fn fetch_fire_risk(client: &Client, property_id: &str) -> Result<Value> {
    let response = send_json(fire_risk_request(client, property_id)?)?;
    Ok(at(&response, "/data", "realtor fire risk")?.clone())
}

/// Fetch and parse a listing page, then look up its noise level.
pub fn scrape_listing(client: &Client, url: &str) -> Result<Sale> {
    log::debug!("Scraping {url}");
    let document = fetch_page(client, url, defaults::HEADERS)?;
    let mut sale = Sale::from_document(url, &document)?;

    if let (Some(lat), Some(lon)) = (sale.latitude(), sale.longitude()) {
        sale.noise = noise_text(&fetch_noise_metrics(client, lat, lon)?);
    }
    Ok(sale)
}

pub fn scrape_result(client: &Client, result: &SearchResult) -> Result<Sale> {
    scrape_listing(client, &result.detail_url())
}

/// Scrape every search result, pausing between fetches.
pub fn scrape_listings(
    client: &Client,
    results: &[SearchResult],
    config: &ScrapeConfig,
) -> Result<Vec<Sale>> {
    scrape_all(client, results, config, scrape_result)
}

/// Wrap search results so each listing is scraped only when accessed.
pub fn lazy_scrape_listings(
    client: &Client,
    results: Vec<SearchResult>,
) -> LazyListings<'_, SearchResult, Sale> {
    LazyListings::new(client, results, scrape_result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_client;

    fn client() -> Client {
        create_client(&HttpConfig::default()).unwrap()
    }

    fn page() -> Html {
        let data = json!({"props": {"pageProps": {"initialState": {"propertyDetails": {
            "property_id": 3543870893u64,
            "listing_date": "2024-05-01T00:00:00Z",
            "status": "for_sale",
            "list_price": 275000,
            "price_per_sqft": 183,
            "source": {"raw": {"tax_amount": 1850.25}},
            "description": {
                "text": "Charming bungalow.",
                "year_built": 1925,
                "beds": 3, "baths": 2, "garage": null,
                "sqft": 1500, "lot_sqft": 8712, "type": "single_family",
            },
            "open_houses": null,
            "details": [{"category": "Interior", "text": ["Hardwood"]}],
            "location": {
                "address": {
                    "line": "123 Main St", "city": "Chattanooga", "state": "Tennessee",
                    "state_code": "TN", "postal_code": "37405",
                    "coordinate": {"lat": 35.07, "lon": -85.31},
                },
                "county": {"name": "Hamilton", "fips_code": "47065"},
                "postal_code": {"geo_statistics": {"housing_market": {"market_status": "seller"}}},
            },
            "hoa": {"fee": null},
            "property_history": [{"event_name": "Listed"}],
            "tax_history": [],
        }}}}});
        Html::parse_document(&format!(
            r#"<html><body><script id="__NEXT_DATA__" type="application/json">{data}</script></body></html>"#
        ))
    }

    fn sale() -> Sale {
        Sale::from_document("https://www.realtor.com/realestateandhomes-detail/x", &page()).unwrap()
    }

    #[test]
    fn test_from_document() {
        let sale = sale();
        assert_eq!(sale.details.property_id, "3543870893");
        assert_eq!(sale.details.description.year_built, Some(1925));
        assert_eq!(sale.street_address(), "123 Main St, Chattanooga, TN 37405");
        assert_eq!(sale.county(), Some("Hamilton"));
        assert_eq!(sale.fips(), Some("47065"));
        assert_eq!(sale.hoa_fee(), 0.0);
        assert_eq!(sale.yearly_property_tax(), Some(1850.25));
        assert_eq!(sale.area_market_status().unwrap()["market_status"], "seller");
        assert!(sale.details.open_houses.is_empty());
        assert_eq!(sale.noise, "Unknown");
    }

    #[test]
    fn test_missing_property_details() {
        let html = r#"<html><body><script id="__NEXT_DATA__">{"props": {"pageProps": {}}}</script></body></html>"#;
        assert!(Sale::from_document("u", &Html::parse_document(html)).is_err());
    }

    #[test]
    fn test_loan_request_defaults_to_twenty_percent() {
        let request = sale().loan_request(None).unwrap();
        assert_eq!(request.down_payment, 55_000.0);
        assert_eq!(request.state_code, "TN");
        assert_eq!(request.hoa_fee, 0.0);

        let built = loan_estimates_request(&client(), &request).build().unwrap();
        let pairs: Vec<(String, String)> = built.url().query_pairs().into_owned().collect();
        assert!(pairs.contains(&("fips".to_string(), "47065".to_string())));
        assert!(pairs.contains(&("down_payment".to_string(), "55000".to_string())));
        assert!(pairs.contains(&("veterans_benefits".to_string(), "false".to_string())));
    }

    #[test]
    fn test_noise_text() {
        assert_eq!(noise_text(&json!({"local_text": "Busy"})), "Busy");
        assert_eq!(noise_text(&json!({})), "Unknown");

        let request = noise_request(&client(), 35.07, -85.31).build().unwrap();
        assert_eq!(request.url().query(), Some("lat=35.07&lon=-85.31"));
    }

    #[test]
    fn test_risk_requests() {
        let client = client();
        let flood = flood_risk_request(&client, "42").unwrap().build().unwrap();
        assert_eq!(flood.url().path(), "/api/v1/hulk");
        assert_eq!(flood.url().query(), Some("client_id=rdc-x&schema=vesta"));
        let body: Value =
            serde_json::from_slice(flood.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body["variables"]["propertyId"], "42");
        assert!(body["query"].as_str().unwrap().contains("flood_factor_score"));

        let fire = fire_risk_request(&client, "42").unwrap().build().unwrap();
        let body: Value = serde_json::from_slice(fire.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body["nrQueryType"], "WILDFIRE_RISK");
    }

    #[test]
    fn test_to_listing() {
        let listing = sale().to_listing();
        assert_eq!(listing.listing_type, ListingType::ForSale);
        assert_eq!(listing.price, Some(275_000.0));
        assert_eq!(listing.latitude, Some(35.07));
        assert_eq!(listing.state.as_deref(), Some("TN"));
    }
}
