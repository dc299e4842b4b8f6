//! Realtor.com listing search: GraphQL payload builder and typed results.

use reqwest::blocking::{Client, Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::defaults;
use crate::error::{AppError, Result};
use crate::models::{Listing, ListingType, Source};
use crate::utils::http::{header_map, send_json, send_ok};
use crate::utils::json::{null_default, string_or_number, take};

/// Field a search can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortBy {
    Relevant,
    Price,
    ListingAge,
    OpenHouseDate,
    LastReduced,
    InteriorSqft,
    LotSize,
}

impl SortBy {
    /// API field name, `None` for relevance ordering.
    pub fn field(self) -> Option<&'static str> {
        match self {
            SortBy::Relevant => None,
            SortBy::Price => Some("list_price"),
            SortBy::ListingAge => Some("list_date"),
            SortBy::OpenHouseDate => Some("open_house_date"),
            SortBy::LastReduced => Some("price_reduced_date"),
            SortBy::InteriorSqft => Some("sqft"),
            SortBy::LotSize => Some("lot_sqft"),
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = AppError;

    /// Accepts `relevant`, `price`, `listing age`, `open house date`,
    /// `last reduced`, `interior sqft` and `lot size`, with `-` or `_`
    /// in place of spaces.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "relevant" => Ok(SortBy::Relevant),
            "price" => Ok(SortBy::Price),
            "listing age" => Ok(SortBy::ListingAge),
            "open house date" => Ok(SortBy::OpenHouseDate),
            "last reduced" => Ok(SortBy::LastReduced),
            "interior sqft" => Ok(SortBy::InteriorSqft),
            "lot size" => Ok(SortBy::LotSize),
            _ => Err(AppError::invalid(format!("invalid sort '{s}'"))),
        }
    }
}

/// Simple filter criteria for a location search.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPreset {
    /// Free-text location, e.g. `"Chattanooga, TN"`
    pub search_location: String,
    pub status: Vec<String>,
    pub primary: bool,
}

impl FilterPreset {
    /// Primary for-sale and ready-to-build listings around `search_location`.
    pub fn for_sale(search_location: impl Into<String>) -> Self {
        Self {
            search_location: search_location.into(),
            status: vec!["for_sale".to_string(), "ready_to_build".to_string()],
            primary: true,
        }
    }

    pub fn to_filter_query(&self) -> Value {
        json!({
            "primary": self.primary,
            "status": self.status,
            "search_location": {"location": self.search_location},
        })
    }
}

/// Builder for the listing search GraphQL POST.
///
/// Wraps the raw JSON payload. Setters taking an `Option` remove the key
/// when given `None`.
#[derive(Debug, Clone)]
pub struct Query {
    post_params: Vec<(String, String)>,
    payload: Map<String, Value>,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    pub fn new() -> Self {
        let payload = match defaults::listing_search_payload() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            post_params: defaults::POST_PARAMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            payload,
        }
    }

    /// Replace the POST query parameters. An empty list restores the defaults.
    pub fn post_params(mut self, params: &[(&str, &str)]) -> Self {
        let params = if params.is_empty() {
            defaults::POST_PARAMS
        } else {
            params
        };
        self.post_params = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    /// Replace the whole payload.
    pub fn payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Edit `variables`, replacing it with an empty object if it is not one.
    fn edit_variables(&mut self, edit: impl FnOnce(&mut Map<String, Value>)) {
        match self.payload.get_mut("variables") {
            Some(Value::Object(variables)) => edit(variables),
            _ => {
                let mut variables = Map::new();
                edit(&mut variables);
                self.payload
                    .insert("variables".to_string(), Value::Object(variables));
            }
        }
    }

    pub fn set_variable(mut self, key: &str, value: Value) -> Self {
        self.edit_variables(|variables| {
            variables.insert(key.to_string(), value);
        });
        self
    }

    pub fn remove_variable(mut self, key: &str) -> Self {
        self.edit_variables(|variables| {
            variables.remove(key);
        });
        self
    }

    fn variable(self, key: &str, value: Option<Value>) -> Self {
        match value {
            Some(value) => self.set_variable(key, value),
            None => self.remove_variable(key),
        }
    }

    fn top_level(mut self, key: &str, value: Option<Value>) -> Self {
        match value {
            Some(value) => {
                self.payload.insert(key.to_string(), value);
            }
            None => {
                self.payload.remove(key);
            }
        }
        self
    }

    pub fn client_data(self, client_data: Option<Value>) -> Self {
        self.variable("client_data", client_data)
    }

    /// Maximum number of results returned.
    pub fn limit(self, limit: Option<u32>) -> Self {
        self.variable("limit", limit.map(Value::from))
    }

    /// Index of the first result, counting from 0. Pagination is `offset = page * limit`.
    pub fn offset(self, offset: Option<u32>) -> Self {
        self.variable("offset", offset.map(Value::from))
    }

    pub fn sort_type(self, sort_type: Option<Value>) -> Self {
        self.variable("sort_type", sort_type)
    }

    pub fn sort(self, sort: Option<Value>) -> Self {
        self.variable("sort", sort)
    }

    /// Sort by a known field. `sort` and `sort_type` are mutually exclusive.
    pub fn sort_preset(self, by: SortBy, ascending: bool) -> Self {
        match by.field() {
            None => self.sort(None).sort_type(Some(json!("relevant"))),
            Some(field) => {
                let direction = if ascending { "asc" } else { "desc" };
                self.sort_type(None)
                    .sort(Some(json!({"field": field, "direction": direction})))
            }
        }
    }

    pub fn zoho_query(self, zoho_query: Option<Value>) -> Self {
        self.variable("zohoQuery", zoho_query)
    }

    pub fn geo_supported_slug(self, slug: Option<Value>) -> Self {
        self.variable("geoSupportedSlug", slug)
    }

    pub fn by_prop_type(self, by_prop_type: Option<Value>) -> Self {
        self.variable("by_prop_type", by_prop_type)
    }

    pub fn graphql_query(mut self, query: impl Into<String>) -> Self {
        self.payload
            .insert("query".to_string(), Value::String(query.into()));
        self
    }

    /// Raw filter criteria (`variables.query`).
    pub fn filter_query(self, query: Value) -> Self {
        self.set_variable("query", query)
    }

    pub fn filter_query_preset(self, preset: &FilterPreset) -> Self {
        self.filter_query(preset.to_filter_query())
    }

    pub fn operation_name(self, name: Option<&str>) -> Self {
        self.top_level("operationName", name.map(Value::from))
    }

    pub fn call_from(self, call_from: Option<&str>) -> Self {
        self.top_level("callfrom", call_from.map(Value::from))
    }

    pub fn nr_query_type(self, nr_query_type: Option<&str>) -> Self {
        self.top_level("nrQueryType", nr_query_type.map(Value::from))
    }

    pub fn visitor_id(self, visitor_id: Option<&str>) -> Self {
        self.top_level("visitor_id", visitor_id.map(Value::from))
    }

    pub fn is_client(self, is_client: Option<bool>) -> Self {
        self.top_level("isClient", is_client.map(Value::from))
    }

    pub fn seo_payload(self, seo_payload: Option<Value>) -> Self {
        self.top_level("seoPayload", seo_payload)
    }

    pub fn get_payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn get_post_params(&self) -> &[(String, String)] {
        &self.post_params
    }

    pub fn request_with(
        &self,
        client: &Client,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        Ok(client
            .post(url)
            .query(&self.post_params)
            .headers(header_map(headers)?)
            .json(&self.payload))
    }

    pub fn build_request(&self, client: &Client) -> Result<Request> {
        Ok(self
            .request_with(client, defaults::SEARCH_URL, defaults::GRAPHQL_HEADERS)?
            .build()?)
    }

    pub fn send(&self, client: &Client) -> Result<Response> {
        send_ok(self.request_with(client, defaults::SEARCH_URL, defaults::GRAPHQL_HEADERS)?)
    }

    /// Full JSON response.
    pub fn get_response(&self, client: &Client) -> Result<Value> {
        log::debug!("POST {}", defaults::SEARCH_URL);
        send_json(self.request_with(client, defaults::SEARCH_URL, defaults::GRAPHQL_HEADERS)?)
    }

    pub fn get_results(&self, client: &Client) -> Result<SearchResults> {
        parse_results(&self.get_response(client)?)
    }
}

/// Extract `data.home_search` from a search response.
pub fn parse_results(response: &Value) -> Result<SearchResults> {
    if let Some(errors) = response.get("errors").filter(|e| !e.is_null()) {
        return Err(AppError::shape("realtor search", errors));
    }
    take(response, "/data/home_search", "realtor search")
}

/// `data.home_search` of a search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "null_default")]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultAddress {
    pub line: Option<String>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub city: Option<String>,
    pub coordinate: Option<Coordinate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct County {
    pub name: Option<String>,
    pub fips_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultLocation {
    #[serde(default, deserialize_with = "null_default")]
    pub address: ResultAddress,
    #[serde(default)]
    pub county: Option<County>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultDescription {
    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub garage: Option<f64>,
    pub stories: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sub_type: Option<String>,
    pub lot_sqft: Option<f64>,
    pub sqft: Option<f64>,
    pub year_built: Option<i32>,
    pub name: Option<String>,
}

/// One entry of `home_search.results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(deserialize_with = "string_or_number")]
    pub property_id: String,
    pub permalink: String,
    #[serde(default)]
    pub listing_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub list_price: Option<f64>,
    #[serde(default)]
    pub list_date: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub description: ResultDescription,
    #[serde(default, deserialize_with = "null_default")]
    pub location: ResultLocation,
    #[serde(default)]
    pub flags: Option<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    pub fn detail_url(&self) -> String {
        format!("{}{}", defaults::DETAIL_URL_PREFIX, self.permalink)
    }

    pub fn to_listing(&self) -> Listing {
        let listing_type = self
            .status
            .as_deref()
            .map_or(ListingType::Other, ListingType::from_status);
        let address = &self.location.address;
        let coordinate = address.coordinate;

        let mut listing = Listing::new(Source::Realtor, listing_type, self.detail_url());
        listing.address = address.line.clone().unwrap_or_default();
        listing.city = address.city.clone();
        listing.state = address.state_code.clone().or_else(|| address.state.clone());
        listing.zip = address.postal_code.clone();
        listing.price = self.list_price;
        listing.property_type = self.description.kind.clone();
        listing.bedrooms = self.description.beds;
        listing.bathrooms = self.description.baths;
        listing.interior_sqft = self.description.sqft;
        listing.lot_sqft = self.description.lot_sqft;
        listing.latitude = coordinate.and_then(|c| c.lat);
        listing.longitude = coordinate.and_then(|c| c.lon);
        listing
    }
}
