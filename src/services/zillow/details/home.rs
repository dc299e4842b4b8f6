//! Property data shared by sale and rental home pages.

use std::collections::BTreeMap;

use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::page;
use crate::error::Result;
use crate::models::{Listing, ListingType, Source};
use crate::utils::json::{null_default, string_or_number, take};
use crate::utils::units::parse_lot_size;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRecord {
    /// Epoch milliseconds
    pub time: Option<i64>,
    pub tax_paid: Option<f64>,
    pub tax_increase_rate: Option<f64>,
    pub value: Option<f64>,
    pub value_increase_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEvent {
    pub date: Option<String>,
    pub time: Option<i64>,
    pub price: Option<f64>,
    pub event: Option<String>,
    pub source: Option<String>,
    pub price_per_squarefoot: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtAGlanceFact {
    pub fact_label: String,
    pub fact_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeAndDue {
    pub name: Option<String>,
    pub fee: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub phone: Option<String>,
}

/// The `resoFacts` block of a property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResoFacts {
    #[serde(default, deserialize_with = "null_default")]
    pub appliances: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub cooling: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub heating: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub community_features: Vec<String>,
    /// Often wrong on the site itself
    #[serde(default)]
    pub fireplaces: Option<f64>,
    #[serde(default)]
    pub has_garage: Option<bool>,
    #[serde(default, deserialize_with = "null_default")]
    pub interior_features: Vec<String>,
    #[serde(default)]
    pub attic: Option<String>,
    #[serde(default)]
    pub basement: Option<String>,
    /// Display string such as `"$50 monthly"`
    #[serde(default)]
    pub hoa_fee: Option<String>,
    #[serde(default)]
    pub levels: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub parking_features: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub lot_features: Vec<String>,
    /// Lot size with units, e.g. `"2 Acres"`
    #[serde(default)]
    pub lot_size: Option<String>,
    #[serde(default)]
    pub lot_size_dimensions: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub sewer: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub water_source: Vec<String>,
    #[serde(default)]
    pub parcel_number: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub fees_and_dues: Vec<FeeAndDue>,
    #[serde(default, deserialize_with = "null_default")]
    pub at_a_glance_facts: Vec<AtAGlanceFact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default, deserialize_with = "null_default")]
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeInsight {
    #[serde(default, deserialize_with = "null_default")]
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageRates {
    /// Percent, e.g. `6.5`
    pub thirty_year_fixed_rate: Option<f64>,
}

/// `property` object of the full api cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(deserialize_with = "string_or_number")]
    pub zpid: String,
    #[serde(default)]
    pub home_status: Option<String>,
    #[serde(default)]
    pub home_type: Option<String>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub zestimate: Option<f64>,
    #[serde(default)]
    pub rent_zestimate: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub tax_history: Vec<TaxRecord>,
    #[serde(default, deserialize_with = "null_default")]
    pub price_history: Vec<PriceEvent>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub days_on_zillow: Option<i64>,
    #[serde(default)]
    pub page_view_count: Option<i64>,
    #[serde(default)]
    pub favorite_count: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub address: Address,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub living_area: Option<f64>,
    /// Lot area in sqft when Zillow knows it numerically
    #[serde(default)]
    pub lot_size: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub reso_facts: ResoFacts,
    #[serde(default)]
    pub attribution_info: Option<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub schools: Vec<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub nearby_homes: Vec<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub home_insights: Vec<HomeInsight>,
    #[serde(default)]
    pub mortgage_rates: Option<MortgageRates>,
    /// Percent, e.g. `1.1`
    #[serde(default)]
    pub property_tax_rate: Option<f64>,
    #[serde(default)]
    pub monthly_hoa_fee: Option<f64>,
}

/// A Zillow home details page (`/homedetails/...`).
#[derive(Debug, Clone, Serialize)]
pub struct HomeDetails {
    pub url: String,
    pub property: Property,
    /// Variant entry of the api cache
    pub variant_cache: Value,
    /// Untyped `property` object, for fields not modelled in [`Property`]
    pub raw_property: Value,
}

impl HomeDetails {
    pub fn from_document(url: &str, document: &Html) -> Result<Self> {
        let preload = page::api_preload(document)?;
        let (variant_cache, full_cache) = page::split_api_cache(preload)?;
        Self::from_caches(url, variant_cache, &full_cache)
    }

    pub fn from_caches(url: &str, variant_cache: Value, full_cache: &Value) -> Result<Self> {
        let property: Property = take(full_cache, "/property", "zillow property")?;
        let raw_property = full_cache["property"].clone();
        Ok(Self {
            url: url.to_string(),
            property,
            variant_cache,
            raw_property,
        })
    }

    pub fn zpid(&self) -> &str {
        &self.property.zpid
    }

    pub fn reso_facts(&self) -> &ResoFacts {
        &self.property.reso_facts
    }

    /// At-a-glance facts keyed by label.
    pub fn at_a_glance(&self) -> BTreeMap<String, Option<String>> {
        self.property
            .reso_facts
            .at_a_glance_facts
            .iter()
            .map(|fact| (fact.fact_label.clone(), fact.fact_value.clone()))
            .collect()
    }

    /// Highlight phrases such as "Rolling hills".
    pub fn tags(&self) -> Vec<String> {
        self.property
            .home_insights
            .iter()
            .flat_map(|insight| &insight.insights)
            .flat_map(|insight| insight.phrases.iter().cloned())
            .collect()
    }

    /// Every non-null entry of the raw `resoFacts` object.
    pub fn facts_and_features(&self) -> Map<String, Value> {
        match self.raw_property.get("resoFacts") {
            Some(Value::Object(facts)) => facts
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            _ => Map::new(),
        }
    }

    /// Lot area in sqft, from the numeric lot size or the facts string.
    pub fn lot_sqft(&self) -> Result<Option<f64>> {
        if let Some(sqft) = self.property.lot_size {
            return Ok(Some(sqft));
        }
        self.property
            .reso_facts
            .lot_size
            .as_deref()
            .map(parse_lot_size)
            .transpose()
    }

    /// Flatten into a [`Listing`]. An unparseable lot size is logged and left empty.
    pub fn to_listing(&self, listing_type: ListingType) -> Listing {
        let property = &self.property;
        let mut listing = Listing::new(Source::Zillow, listing_type, self.url.clone());
        listing.address = property.address.street_address.clone().unwrap_or_default();
        listing.city = property.address.city.clone();
        listing.state = property.address.state.clone();
        listing.zip = property.address.zipcode.clone();
        listing.price = property.price;
        listing.property_type = property.home_type.clone();
        listing.bedrooms = property.bedrooms;
        listing.bathrooms = property.bathrooms;
        listing.interior_sqft = property.living_area;
        listing.lot_sqft = self.lot_sqft().unwrap_or_else(|e| {
            log::debug!("Ignoring lot size of {}: {e}", self.url);
            None
        });
        listing.latitude = property.latitude;
        listing.longitude = property.longitude;
        listing
    }
}
