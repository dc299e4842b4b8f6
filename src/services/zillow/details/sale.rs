//! Homes listed for sale.

use scraper::Html;
use serde::Serialize;

use super::home::HomeDetails;
use crate::error::{AppError, Result};
use crate::models::{Listing, ListingType};
use crate::services::zillow::defaults::{FALLBACK_INTEREST_RATE, HOME_INSURANCE_RATE};
use crate::utils::html::select_text;
use crate::utils::units::monthly_mortgage;

const LIKELY_TO_SELL_SELECTOR: &str = "p.kHeRng";

/// Overrides for [`Sale::monthly_estimated_cost`].
///
/// Rates are annual fractions (6% is `0.06`); money amounts are monthly.
/// Unset values fall back to what the listing reports.
#[derive(Debug, Clone, PartialEq)]
pub struct CostOptions {
    pub interest: Option<f64>,
    pub months: u32,
    /// Annual property tax rate
    pub tax: Option<f64>,
    pub home_insurance: Option<f64>,
    pub mortgage_insurance: f64,
    pub hoa_fee: Option<f64>,
    pub utilities: f64,
}

impl Default for CostOptions {
    fn default() -> Self {
        Self {
            interest: None,
            months: 30 * 12,
            tax: None,
            home_insurance: None,
            mortgage_insurance: 0.0,
            hoa_fee: None,
            utilities: 0.0,
        }
    }
}

/// A Zillow sale listing.
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    pub home: HomeDetails,
    /// Zillow's "likely to sell" estimate, when shown
    pub likely_to_sell: Option<String>,
}

impl Sale {
    pub fn from_document(url: &str, document: &Html) -> Result<Self> {
        let home = HomeDetails::from_document(url, document)?;
        let likely_to_sell =
            select_text(document, LIKELY_TO_SELL_SELECTOR)?.map(|text| text.replace('\u{200a}', ""));
        Ok(Self {
            home,
            likely_to_sell,
        })
    }

    pub fn parcel_number(&self) -> Option<&str> {
        self.home.property.reso_facts.parcel_number.as_deref()
    }

    /// Estimated monthly cost of owning the home after a down payment of `down`.
    pub fn monthly_estimated_cost(&self, down: f64, options: &CostOptions) -> Result<f64> {
        let property = &self.home.property;
        let price = property
            .price
            .ok_or_else(|| AppError::shape("zillow sale", "listing has no price"))?;
        if down > price {
            return Err(AppError::invalid(format!(
                "down payment {down} exceeds price {price}"
            )));
        }

        let interest = options.interest.unwrap_or_else(|| {
            property
                .mortgage_rates
                .as_ref()
                .and_then(|rates| rates.thirty_year_fixed_rate)
                .filter(|rate| *rate > 0.0)
                .map_or(FALLBACK_INTEREST_RATE, |rate| rate / 100.0)
        });
        let tax_rate = options
            .tax
            .or_else(|| property.property_tax_rate.map(|rate| rate / 100.0))
            .unwrap_or(0.0);
        let home_insurance = options
            .home_insurance
            .unwrap_or(HOME_INSURANCE_RATE * price / 12.0);
        let hoa_fee = options.hoa_fee.or(property.monthly_hoa_fee).unwrap_or(0.0);

        let mortgage = monthly_mortgage(price - down, interest / 12.0, options.months);
        let tax = tax_rate * price / 12.0;

        Ok(mortgage + tax + home_insurance + options.mortgage_insurance + hoa_fee + options.utilities)
    }

    pub fn to_listing(&self) -> Listing {
        self.home.to_listing(ListingType::ForSale)
    }
}
