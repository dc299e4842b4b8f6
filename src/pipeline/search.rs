// src/pipeline/search.rs

//! Search orchestration behind the command-line front-end.

use chrono::Utc;
use reqwest::blocking::Client;

use crate::error::Result;
use crate::models::{Config, Listing};
use crate::services::{landwatch, realtor, zillow};

/// Zillow search options.
#[derive(Debug, Clone, Default)]
pub struct ZillowSearch {
    pub term: String,
    pub page: u32,
    /// Rentals instead of homes for sale
    pub rent: bool,
    /// Scrape each result's detail page
    pub details: bool,
    pub max: Option<usize>,
}

impl ZillowSearch {
    pub fn query(&self) -> zillow::Query {
        let preset = zillow::FilterPreset {
            for_sale: !self.rent,
            home_types: None,
        };
        zillow::Query::new()
            .search_term(&self.term)
            .page(self.page.max(1))
            .filter(&preset)
    }
}

/// Realtor.com search options.
#[derive(Debug, Clone)]
pub struct RealtorSearch {
    pub location: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort: realtor::SortBy,
    pub ascending: bool,
    pub details: bool,
    pub max: Option<usize>,
}

impl RealtorSearch {
    pub fn query(&self) -> realtor::Query {
        let mut query = realtor::Query::new()
            .filter_query_preset(&realtor::FilterPreset::for_sale(&self.location))
            .sort_preset(self.sort, self.ascending);
        if self.limit.is_some() {
            query = query.limit(self.limit);
        }
        if self.offset.is_some() {
            query = query.offset(self.offset);
        }
        query
    }
}

fn truncate<T>(items: &mut Vec<T>, max: Option<usize>) {
    if let Some(max) = max {
        items.truncate(max);
    }
}

/// Search Zillow and flatten the results.
pub fn run_zillow(client: &Client, config: &Config, search: &ZillowSearch) -> Result<Vec<Listing>> {
    let start = Utc::now();
    log::info!("Searching Zillow for '{}'", search.term);

    let mut results = search.query().get_results(client)?;
    log::info!("Zillow returned {} results", results.len());
    truncate(&mut results, search.max);

    let listings: Vec<Listing> = if search.details {
        zillow::scrape_listings(client, &results, &config.scrape)?
            .iter()
            .map(zillow::ZillowListing::to_listing)
            .collect()
    } else {
        results.iter().map(zillow::SearchResult::to_listing).collect()
    };

    log::info!(
        "Zillow search finished in {}s",
        (Utc::now() - start).num_seconds()
    );
    Ok(listings)
}

/// Search Realtor.com and flatten the results.
pub fn run_realtor(client: &Client, config: &Config, search: &RealtorSearch) -> Result<Vec<Listing>> {
    let start = Utc::now();
    log::info!("Searching Realtor.com for '{}'", search.location);

    let response = search.query().get_results(client)?;
    log::info!(
        "Realtor.com returned {} of {} results",
        response.results.len(),
        response.total.unwrap_or_default()
    );
    let mut results = response.results;
    truncate(&mut results, search.max);

    let listings: Vec<Listing> = if search.details {
        realtor::scrape_listings(client, &results, &config.scrape)?
            .iter()
            .map(realtor::Sale::to_listing)
            .collect()
    } else {
        results.iter().map(realtor::SearchResult::to_listing).collect()
    };

    log::info!(
        "Realtor.com search finished in {}s",
        (Utc::now() - start).num_seconds()
    );
    Ok(listings)
}

/// Search LandWatch and flatten the results.
pub fn run_landwatch(client: &Client, query: &landwatch::Query) -> Result<Vec<Listing>> {
    log::info!("Searching LandWatch: {}", query.create_url());

    let results = query.get_results(client)?;
    log::info!("LandWatch returned {} results", results.len());

    Ok(landwatch::scrape_listings(&results)?
        .iter()
        .map(landwatch::ListingDetails::to_listing)
        .collect())
}
