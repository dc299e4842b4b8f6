//! Zillow search query builder.

use std::collections::HashSet;

use reqwest::blocking::{Client, Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::defaults;
use crate::error::Result;
use crate::models::{Listing, ListingType, Source};
use crate::utils::http::{header_map, send_json, send_ok};
use crate::utils::json::{opt_string_or_number, take};
use crate::utils::resolve;

/// Map bounding box, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    current_page: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegionSelection {
    region_id: u64,
    region_type: u32,
}

/// The `searchQueryState` parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchQueryState {
    pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    users_search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_bounds: Option<MapBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_selection: Option<Vec<RegionSelection>>,
    is_map_visible: bool,
    is_list_visible: bool,
    map_zoom: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_state: Option<Value>,
}

impl Default for SearchQueryState {
    fn default() -> Self {
        Self {
            pagination: Pagination { current_page: 1 },
            users_search_term: None,
            map_bounds: None,
            region_selection: None,
            is_map_visible: true,
            is_list_visible: true,
            map_zoom: 11,
            filter_state: None,
        }
    }
}

/// Zillow home type filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeType {
    SingleFamily,
    Townhouse,
    MultiFamily,
    Condo,
    LotLand,
    Apartment,
    Manufactured,
}

impl HomeType {
    pub const ALL: [HomeType; 7] = [
        HomeType::SingleFamily,
        HomeType::Townhouse,
        HomeType::MultiFamily,
        HomeType::Condo,
        HomeType::LotLand,
        HomeType::Apartment,
        HomeType::Manufactured,
    ];

    fn filter_key(self) -> &'static str {
        match self {
            HomeType::SingleFamily => "isSingleFamily",
            HomeType::Townhouse => "isTownhouse",
            HomeType::MultiFamily => "isMultiFamily",
            HomeType::Condo => "isCondo",
            HomeType::LotLand => "isLotLand",
            HomeType::Apartment => "isApartment",
            HomeType::Manufactured => "isManufactured",
        }
    }
}

/// Simplified filter that expands into Zillow's `filterState`.
#[derive(Debug, Clone)]
pub struct FilterPreset {
    /// `true` searches sale listings, `false` rentals
    pub for_sale: bool,

    /// Home types to keep; `None` keeps all
    pub home_types: Option<HashSet<HomeType>>,
}

impl Default for FilterPreset {
    fn default() -> Self {
        Self {
            for_sale: true,
            home_types: None,
        }
    }
}

impl FilterPreset {
    const SALE_FLAGS: [&'static str; 6] = [
        "isForSaleByAgent",
        "isForSaleByOwner",
        "isNewConstruction",
        "isComingSoon",
        "isAuction",
        "isForSaleForeclosure",
    ];

    /// Expand into a `filterState` object.
    pub fn to_filter_state(&self) -> Value {
        let mut state = Map::new();

        if !self.for_sale {
            state.insert("isForRent".into(), json!({ "value": true }));
            for flag in Self::SALE_FLAGS {
                state.insert(flag.into(), json!({ "value": false }));
            }
        }

        if let Some(keep) = &self.home_types {
            for home_type in HomeType::ALL {
                if !keep.contains(&home_type) {
                    state.insert(home_type.filter_key().into(), json!({ "value": false }));
                }
            }
        }

        Value::Object(state)
    }
}

/// Search request against Zillow's search page state API.
///
/// ```
/// use realty::zillow::Query;
///
/// let query = Query::new()
///     .page(2)
///     .search_term("Chattanooga, TN")
///     .map_bounds(-85.583, -85.185, 34.737, 35.407);
/// let params = query.params().unwrap();
/// assert!(params[0].1.contains("\"currentPage\":2"));
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    state: SearchQueryState,
    wants: Value,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    pub fn new() -> Self {
        Self {
            state: SearchQueryState::default(),
            wants: json!({
                "cat1": ["listResults", "mapResults"],
                "cat2": ["total"],
            }),
        }
    }

    /// Page of paginated search results, starting at 1.
    pub fn page(mut self, current_page: u32) -> Self {
        self.state.pagination = Pagination { current_page };
        self
    }

    /// Free-text location, as typed into the search box.
    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.state.users_search_term = Some(term.into());
        self
    }

    pub fn map_bounds(mut self, west: f64, east: f64, south: f64, north: f64) -> Self {
        self.state.map_bounds = Some(MapBounds {
            west,
            east,
            south,
            north,
        });
        self
    }

    /// Zillow-internal region id and type.
    pub fn region(mut self, region_id: u64, region_type: u32) -> Self {
        self.state.region_selection = Some(vec![RegionSelection {
            region_id,
            region_type,
        }]);
        self
    }

    pub fn map_visible(mut self, visible: bool) -> Self {
        self.state.is_map_visible = visible;
        self
    }

    pub fn list_visible(mut self, visible: bool) -> Self {
        self.state.is_list_visible = visible;
        self
    }

    pub fn map_zoom(mut self, zoom: u8) -> Self {
        self.state.map_zoom = zoom;
        self
    }

    /// Replace the `wants` parameter (which result categories to return).
    pub fn wants(mut self, wants: Value) -> Self {
        self.wants = wants;
        self
    }

    pub fn filter(mut self, preset: &FilterPreset) -> Self {
        self.state.filter_state = Some(preset.to_filter_state());
        self
    }

    /// Set `filterState` verbatim.
    pub fn raw_filter(mut self, filter_state: Value) -> Self {
        self.state.filter_state = Some(filter_state);
        self
    }

    /// The `searchQueryState` and `wants` parameters as JSON strings.
    pub fn params(&self) -> Result<[(&'static str, String); 2]> {
        Ok([
            ("searchQueryState", serde_json::to_string(&self.state)?),
            ("wants", serde_json::to_string(&self.wants)?),
        ])
    }

    /// Request builder for an arbitrary endpoint and header table.
    pub fn request_with(
        &self,
        client: &Client,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        Ok(client
            .get(url)
            .headers(header_map(headers)?)
            .query(&self.params()?))
    }

    /// Build, without sending, the default search request.
    pub fn build_request(&self, client: &Client) -> Result<Request> {
        Ok(self
            .request_with(client, defaults::SEARCH_URL, defaults::HEADERS)?
            .build()?)
    }

    /// Send the search request and return the raw response.
    pub fn send(&self, client: &Client) -> Result<Response> {
        log::debug!("Zillow search {}", defaults::SEARCH_URL);
        let request = self.request_with(client, defaults::SEARCH_URL, defaults::HEADERS)?;
        send_ok(request)
    }

    /// Send the search request and return the full JSON document.
    pub fn get_response(&self, client: &Client) -> Result<Value> {
        log::debug!("Zillow search {}", defaults::SEARCH_URL);
        send_json(self.request_with(client, defaults::SEARCH_URL, defaults::HEADERS)?)
    }

    /// Send the search request and return the typed list results.
    pub fn get_results(&self, client: &Client) -> Result<Vec<SearchResult>> {
        let response = self.get_response(client)?;
        parse_results(&response)
    }
}

/// Extract `cat1.searchResults.listResults` from a search response.
pub fn parse_results(response: &Value) -> Result<Vec<SearchResult>> {
    take(response, "/cat1/searchResults/listResults", "zillow search")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One entry of a Zillow search result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Zillow property id (absent for apartment buildings)
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub zpid: Option<String>,

    /// Detail page URL, absolute for homes and relative (`/b/...`) for buildings
    pub detail_url: String,

    /// `FOR_SALE`, `FOR_RENT`, ...
    pub status_type: String,

    #[serde(default)]
    pub status_text: Option<String>,

    /// Display price, e.g. `"$350,000"` or `"$1,450/mo"`
    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub unformatted_price: Option<f64>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub address_street: Option<String>,

    #[serde(default)]
    pub address_city: Option<String>,

    #[serde(default)]
    pub address_state: Option<String>,

    #[serde(default)]
    pub address_zipcode: Option<String>,

    #[serde(default)]
    pub beds: Option<f64>,

    #[serde(default)]
    pub baths: Option<f64>,

    /// Interior area in sqft
    #[serde(default)]
    pub area: Option<f64>,

    #[serde(default)]
    pub lat_long: Option<LatLong>,

    #[serde(default)]
    pub hdp_data: Option<Value>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    /// Absolute detail page URL.
    pub fn absolute_detail_url(&self) -> String {
        resolve(defaults::BASE_URL, &self.detail_url).unwrap_or_else(|| self.detail_url.clone())
    }

    /// Home type reported in `hdpData.homeInfo.homeType`.
    pub fn home_type(&self) -> Option<&str> {
        self.hdp_data
            .as_ref()?
            .pointer("/homeInfo/homeType")?
            .as_str()
    }

    pub fn to_listing(&self) -> Listing {
        let mut listing = Listing::new(
            Source::Zillow,
            ListingType::from_status(&self.status_type),
            self.absolute_detail_url(),
        );
        listing.address = self
            .address_street
            .clone()
            .or_else(|| self.address.clone())
            .unwrap_or_default();
        listing.city = self.address_city.clone();
        listing.state = self.address_state.clone();
        listing.zip = self.address_zipcode.clone();
        listing.price = self.unformatted_price;
        listing.property_type = self.home_type().map(str::to_string);
        listing.bedrooms = self.beds;
        listing.bathrooms = self.baths;
        listing.interior_sqft = self.area;
        listing.latitude = self.lat_long.and_then(|ll| ll.latitude);
        listing.longitude = self.lat_long.and_then(|ll| ll.longitude);
        listing
    }
}
