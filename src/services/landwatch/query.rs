//! LandWatch search: URL path builder and the property search API.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use reqwest::blocking::{Client, Request, RequestBuilder, Response};
use serde_json::{Map, Value};

use super::defaults;
use crate::error::{AppError, Result};
use crate::utils::http::{header_map, send_json, send_ok};
use crate::utils::json::take;
use crate::utils::slugify;

/// One raw entry of `searchResults.propertyResults`.
pub type PropertyResult = Map<String, Value>;

/// LandWatch property categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyType {
    Commercial,
    FarmsAndRanches,
    Homesite,
    Horse,
    House,
    Hunting,
    Lakefront,
    Oceanfront,
    Recreational,
    Riverfront,
    Timberland,
    Undeveloped,
    Waterfront,
}

impl PropertyType {
    pub const ALL: [PropertyType; 13] = [
        PropertyType::Commercial,
        PropertyType::FarmsAndRanches,
        PropertyType::Homesite,
        PropertyType::Horse,
        PropertyType::House,
        PropertyType::Hunting,
        PropertyType::Lakefront,
        PropertyType::Oceanfront,
        PropertyType::Recreational,
        PropertyType::Riverfront,
        PropertyType::Timberland,
        PropertyType::Undeveloped,
        PropertyType::Waterfront,
    ];

    /// Display label used by the site.
    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Commercial => "Commercial",
            PropertyType::FarmsAndRanches => "Farms and Ranches",
            PropertyType::Homesite => "Homesite",
            PropertyType::Horse => "Horse",
            PropertyType::House => "House",
            PropertyType::Hunting => "Hunting",
            PropertyType::Lakefront => "Lakefront",
            PropertyType::Oceanfront => "Oceanfront",
            PropertyType::Recreational => "Recreational",
            PropertyType::Riverfront => "Riverfront",
            PropertyType::Timberland => "Timberland",
            PropertyType::Undeveloped => "Undeveloped",
            PropertyType::Waterfront => "Waterfront",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PropertyType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = slugify(s);
        PropertyType::ALL
            .into_iter()
            .find(|t| slugify(t.label()) == wanted)
            .ok_or_else(|| AppError::invalid(format!("unknown property type '{s}'")))
    }
}

/// Whether to include sales, auctions, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SaleType {
    #[default]
    Sale,
    Auction,
    Both,
}

impl FromStr for SaleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sale" => Ok(SaleType::Sale),
            "auction" => Ok(SaleType::Auction),
            "both" => Ok(SaleType::Both),
            other => Err(AppError::invalid(format!(
                "sale type must be sale, auction or both, was '{other}'"
            ))),
        }
    }
}

/// LandWatch search filters.
///
/// Filters are encoded as URL path segments; see [`Query::create_url`].
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub state: Option<String>,
    pub region: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,

    pub price_min: Option<u64>,
    pub price_max: Option<u64>,

    /// Acres
    pub size_min: Option<u64>,
    pub size_max: Option<u64>,

    pub property_types: BTreeSet<PropertyType>,

    pub beds_min: Option<u32>,
    pub beds_max: Option<u32>,
    pub baths_min: Option<u32>,
    pub baths_max: Option<u32>,

    pub activity: Option<String>,

    pub available: bool,
    pub under_contract: bool,
    pub off_market: bool,
    pub sold: bool,

    pub sale_type: SaleType,

    pub owner_financing: bool,
    pub mineral_rights: bool,
    pub virtual_tour: bool,

    pub keywords: Vec<String>,

    /// 1-based result page
    pub page: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            state: None,
            region: None,
            county: None,
            city: None,
            price_min: None,
            price_max: None,
            size_min: None,
            size_max: None,
            property_types: BTreeSet::new(),
            beds_min: None,
            beds_max: None,
            baths_min: None,
            baths_max: None,
            activity: None,
            available: true,
            under_contract: false,
            off_market: false,
            sold: false,
            sale_type: SaleType::Sale,
            owner_financing: false,
            mineral_rights: false,
            virtual_tour: false,
            keywords: Vec::new(),
            page: 1,
        }
    }
}

fn range_link(prefix: &str, min: Option<u64>, max: Option<u64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("/{prefix}-{min}-{max}"),
        (None, Some(max)) => format!("/{prefix}-under-{max}"),
        (Some(min), None) => format!("/{prefix}-over-{min}"),
        (None, None) => String::new(),
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `/<state>-land-for-sale`
    pub fn link_for_state(state: &str) -> String {
        format!("/{}-land-for-sale", slugify(state))
    }

    /// `/<region>-region`
    pub fn link_for_region(region: &str) -> String {
        format!("/{}-region", slugify(region))
    }

    /// `/<county>-county`
    pub fn link_for_county(county: &str) -> String {
        format!("/{}-county", slugify(county))
    }

    /// `/<city>`
    pub fn link_for_city(city: &str) -> String {
        format!("/{}", slugify(city))
    }

    /// One segment per type, in a fixed order.
    pub fn link_for_property(types: &BTreeSet<PropertyType>) -> String {
        types
            .iter()
            .map(|t| format!("/{}", slugify(t.label())))
            .collect()
    }

    pub fn link_for_price(price_min: Option<u64>, price_max: Option<u64>) -> String {
        range_link("price", price_min, price_max)
    }

    /// Acreage range.
    pub fn link_for_size(size_min: Option<u64>, size_max: Option<u64>) -> String {
        range_link("acres", size_min, size_max)
    }

    pub fn link_for_beds(beds_min: Option<u32>, beds_max: Option<u32>) -> String {
        range_link("beds", beds_min.map(u64::from), beds_max.map(u64::from))
    }

    pub fn link_for_baths(baths_min: Option<u32>, baths_max: Option<u32>) -> String {
        range_link("baths", baths_min.map(u64::from), baths_max.map(u64::from))
    }

    /// `/activity-<activity>`
    pub fn link_for_activity(activity: &str) -> String {
        format!("/activity-{}", slugify(activity))
    }

    pub fn link_for_sale_type(sale_type: SaleType) -> String {
        match sale_type {
            SaleType::Sale => String::new(),
            SaleType::Auction => "/auctions".to_string(),
            SaleType::Both => "/sale-and-auction".to_string(),
        }
    }

    /// Listing statuses; empty when only available listings are wanted or
    /// no status is selected.
    pub fn link_for_status(available: bool, under_contract: bool, off_market: bool, sold: bool) -> String {
        let statuses: Vec<&str> = [
            (available, "available"),
            (under_contract, "under-contract"),
            (off_market, "off-market"),
            (sold, "sold"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();

        if statuses.is_empty() || statuses == ["available"] {
            String::new()
        } else {
            format!("/status-{}", statuses.join("-and-"))
        }
    }

    pub fn link_for_features(owner_financing: bool, mineral_rights: bool, virtual_tour: bool) -> String {
        [
            (owner_financing, "/owner-financing"),
            (mineral_rights, "/mineral-rights"),
            (virtual_tour, "/virtual-tour"),
        ]
        .into_iter()
        .filter_map(|(on, segment)| on.then_some(segment))
        .collect()
    }

    /// `/keywords-<a>+<b>`
    pub fn link_for_keywords(keywords: &[String]) -> String {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| slugify(k))
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            String::new()
        } else {
            format!("/keywords-{}", keywords.join("+"))
        }
    }

    /// Filter path, relative to the site root or the search API.
    pub fn create_path(&self) -> String {
        let mut path = String::new();

        if self.state.is_none() && self.property_types.is_empty() {
            path.push_str("/land");
        }
        if let Some(state) = &self.state {
            path += &Self::link_for_state(state);
        }

        if let Some(city) = &self.city {
            path += &Self::link_for_city(city);
        } else if let Some(county) = &self.county {
            path += &Self::link_for_county(county);
        } else if let Some(region) = &self.region {
            path += &Self::link_for_region(region);
        }

        path += &Self::link_for_property(&self.property_types);
        path += &Self::link_for_price(self.price_min, self.price_max);
        path += &Self::link_for_size(self.size_min, self.size_max);
        path += &Self::link_for_beds(self.beds_min, self.beds_max);
        path += &Self::link_for_baths(self.baths_min, self.baths_max);
        if let Some(activity) = &self.activity {
            path += &Self::link_for_activity(activity);
        }
        path += &Self::link_for_sale_type(self.sale_type);
        path += &Self::link_for_status(self.available, self.under_contract, self.off_market, self.sold);
        path += &Self::link_for_features(self.owner_financing, self.mineral_rights, self.virtual_tour);
        path += &Self::link_for_keywords(&self.keywords);
        if self.page > 1 {
            path += &format!("/page-{}", self.page);
        }

        path
    }

    /// Browser URL of the search.
    pub fn create_url(&self) -> String {
        format!("{}{}", defaults::ROOT_URL, self.create_path())
    }

    /// API URL of the search.
    pub fn api_url(&self) -> String {
        format!("{}{}", defaults::SEARCH_API_URL, self.create_path())
    }

    pub fn request(&self, client: &Client) -> Result<RequestBuilder> {
        Ok(client
            .get(self.api_url())
            .headers(header_map(defaults::HEADERS)?))
    }

    pub fn build_request(&self, client: &Client) -> Result<Request> {
        Ok(self.request(client)?.build()?)
    }

    pub fn send(&self, client: &Client) -> Result<Response> {
        send_ok(self.request(client)?)
    }

    /// Full JSON response.
    pub fn get_response(&self, client: &Client) -> Result<Value> {
        log::debug!("GET {}", self.api_url());
        send_json(self.request(client)?)
    }

    pub fn get_results(&self, client: &Client) -> Result<Vec<PropertyResult>> {
        parse_results(&self.get_response(client)?)
    }
}

/// Extract `searchResults.propertyResults` from a search response.
pub fn parse_results(response: &Value) -> Result<Vec<PropertyResult>> {
    take(response, "/searchResults/propertyResults", "landwatch search")
}
