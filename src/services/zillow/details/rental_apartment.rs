//! Apartment buildings listed for rent (`/b/...` pages).

use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::page;
use crate::error::Result;
use crate::models::{Listing, ListingType, Source};
use crate::utils::json::{null_default, opt_string_or_number, take};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityDetails {
    /// Office hours, one entry per day range
    #[serde(default, deserialize_with = "null_default")]
    pub hours: Vec<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub unit_features: Vec<String>,
}

/// `buildingAttributes` of an apartment building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildingAttributes {
    pub application_fee: Option<f64>,
    pub administrative_fee: Option<f64>,
    pub deposit_fee_min: Option<f64>,
    pub deposit_fee_max: Option<f64>,
    #[serde(deserialize_with = "null_default")]
    pub detailed_parking_policies: Vec<Value>,
    #[serde(deserialize_with = "null_default")]
    pub parking_types: Vec<String>,
    pub detailed_pet_policy: Option<Value>,
    pub has_shared_laundry: Option<bool>,
    pub air_conditioning: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub appliances: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub outdoor_common_areas: Vec<String>,
    pub has_barbecue: Option<bool>,
    pub heating_source: Option<String>,
    pub has_elevator: Option<bool>,
    #[serde(deserialize_with = "null_default")]
    pub community_rooms: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub sports_courts: Vec<String>,
    pub has_bicycle_storage: Option<bool>,
    pub has_guest_suite: Option<bool>,
    pub has_storage: Option<bool>,
    pub has_pet_park: Option<bool>,
    pub has_twenty_four_hour_maintenance: Option<bool>,
    pub has_dry_cleaning_drop_off: Option<bool>,
    pub has_online_rent_payment: Option<bool>,
    pub has_online_maintenance_portal: Option<bool>,
    pub has_onsite_management: Option<bool>,
    pub has_package_service: Option<bool>,
    pub has_valet_trash: Option<bool>,
    pub has_spanish_speaking_staff: Option<bool>,
    #[serde(deserialize_with = "null_default")]
    pub security_types: Vec<String>,
    #[serde(rename = "viewType", deserialize_with = "null_default")]
    pub view_types: Vec<String>,
    pub has_hot_tub: Option<bool>,
    pub has_sauna: Option<bool>,
    pub has_swimming_pool: Option<bool>,
    pub has_assisted_living: Option<bool>,
    pub has_disabled_access: Option<bool>,
    #[serde(deserialize_with = "null_default")]
    pub floor_coverings: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub communication_types: Vec<String>,
    pub has_ceiling_fan: Option<bool>,
    pub has_fireplace: Option<bool>,
    pub has_patio_balcony: Option<bool>,
    pub is_furnished: Option<bool>,
    pub custom_amenities: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floorplan {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub zpid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub beds: Option<f64>,
    #[serde(default)]
    pub baths: Option<f64>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub sqft: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub units: Vec<Value>,
}

/// `props.initialData.building` of an apartment page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub zpid: Option<String>,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_low_income: Option<bool>,
    #[serde(default)]
    pub is_senior_housing: Option<bool>,
    #[serde(default)]
    pub is_student_housing: Option<bool>,
    #[serde(default, deserialize_with = "null_default")]
    pub amenity_details: AmenityDetails,
    #[serde(default)]
    pub building_phone_number: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub building_attributes: BuildingAttributes,
    #[serde(default, deserialize_with = "null_default")]
    pub floorplans: Vec<Floorplan>,
}

/// A Zillow apartment building listing.
#[derive(Debug, Clone, Serialize)]
pub struct RentalApartment {
    pub url: String,
    pub building: Building,
    pub redux_state: Value,
}

impl RentalApartment {
    pub fn from_document(url: &str, document: &Html) -> Result<Self> {
        let next_data = page::next_data(document)?;
        let (initial_data, redux_state) = page::initial_data_and_redux_state(&next_data)?;
        let building = take(&initial_data, "/building", "zillow apartment")?;
        Ok(Self {
            url: url.to_string(),
            building,
            redux_state,
        })
    }

    pub fn office_hours(&self) -> &[Value] {
        &self.building.amenity_details.hours
    }

    pub fn unit_features(&self) -> &[String] {
        &self.building.amenity_details.unit_features
    }

    /// Cheapest advertised rent across floor plans.
    pub fn min_rent(&self) -> Option<f64> {
        self.building
            .floorplans
            .iter()
            .filter_map(|plan| plan.min_price)
            .reduce(f64::min)
    }

    pub fn to_listing(&self) -> Listing {
        let building = &self.building;
        let mut listing = Listing::new(Source::Zillow, ListingType::ForRent, self.url.clone());
        listing.address = building.full_address.clone().unwrap_or_default();
        listing.city = building.city.clone();
        listing.state = building.state.clone();
        listing.zip = building.zipcode.clone();
        listing.price = self.min_rent();
        listing.property_type = Some("APARTMENT".to_string());
        listing.latitude = building.latitude;
        listing.longitude = building.longitude;
        listing
    }
}
