//! Requests against the real sites.
//!
//! These need network access and depend on markup the sites may change at
//! any time, so they are ignored by default:
//!
//! ```text
//! cargo test --test live_sites -- --ignored
//! ```

use realty::models::{HttpConfig, ScrapeConfig};
use realty::utils::http::create_client;
use realty::{landwatch, realtor, zillow};

fn client() -> reqwest::blocking::Client {
    create_client(&HttpConfig::default()).unwrap()
}

#[test]
#[ignore]
fn zillow_search_returns_results() {
    let results = zillow::Query::new()
        .search_term("Chattanooga, TN")
        .get_results(&client())
        .unwrap();
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| !r.detail_url.is_empty()));
}

#[test]
#[ignore]
fn zillow_sale_details() {
    let client = client();
    let results = zillow::Query::new()
        .search_term("Chattanooga, TN")
        .get_results(&client)
        .unwrap();
    let sale = results
        .iter()
        .find(|r| r.status_type == "FOR_SALE")
        .unwrap();

    let listing = zillow::scrape_listing(&client, &sale.detail_url, zillow::StatusType::ForSale).unwrap();
    assert!(matches!(listing, zillow::ZillowListing::Sale(_)));
}

#[test]
#[ignore]
fn realtor_search_results_have_permalinks() {
    let results = realtor::Query::new()
        .filter_query_preset(&realtor::FilterPreset::for_sale("Chattanooga, TN"))
        .get_results(&client())
        .unwrap();
    assert!(!results.results.is_empty());
    assert!(results.results.iter().all(|r| !r.permalink.is_empty()));
}

#[test]
#[ignore]
fn realtor_first_listing_details() {
    let client = client();
    let results = realtor::Query::new()
        .filter_query_preset(&realtor::FilterPreset::for_sale("Chattanooga, TN"))
        .limit(Some(2))
        .get_results(&client)
        .unwrap();

    let sales = realtor::scrape_listings(&client, &results.results[..1], &ScrapeConfig::default()).unwrap();
    assert_eq!(sales.len(), 1);
    assert!(!sales[0].noise.is_empty());
}

#[test]
#[ignore]
fn landwatch_results_carry_expected_keys() {
    let results = landwatch::Query::new().get_results(&client()).unwrap();
    assert!(!results.is_empty());
    for result in &results {
        landwatch::check_property_result_keys(result).unwrap();
    }
}
