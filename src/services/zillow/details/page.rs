//! Data blobs embedded in Zillow detail pages.

use reqwest::blocking::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{AppError, Result};
use crate::services::zillow::defaults;
use crate::utils::html::script_json;
use crate::utils::http::{fetch_page, header_map, send_json};
use crate::utils::json::{at, embedded, take};

const PRELOAD_ID: &str = "hdpApolloPreloadedData";
const NEXT_DATA_ID: &str = "__NEXT_DATA__";

/// Fetch a detail page with Zillow's browser headers.
pub fn get_page(client: &Client, url: &str) -> Result<Html> {
    fetch_page(client, url, defaults::HEADERS)
}

/// Parse `script#hdpApolloPreloadedData` and decode its `apiCache` string.
///
/// The returned object is the preload with `apiCache` replaced by the
/// parsed cache object.
pub fn api_preload(document: &Html) -> Result<Map<String, Value>> {
    let preload = script_json(document, PRELOAD_ID)?;
    let cache = embedded(&preload, "/apiCache", "zillow preload")?;

    let Value::Object(mut preload) = preload else {
        return Err(AppError::shape("zillow preload", "not an object"));
    };
    preload.insert("apiCache".to_string(), cache);
    Ok(preload)
}

/// Split the decoded api cache into its variant and full entries.
///
/// Zillow keys the entries by query name, so keys are matched on the
/// `Variant` and `Full` fragments. Any other key is rejected.
pub fn split_api_cache(mut preload: Map<String, Value>) -> Result<(Value, Value)> {
    let Some(Value::Object(cache)) = preload.remove("apiCache") else {
        return Err(AppError::shape("zillow preload", "apiCache is not an object"));
    };

    let mut variant = None;
    let mut full = None;
    for (key, value) in cache {
        if key.contains("Variant") {
            variant = Some(value);
        } else if key.contains("Full") {
            full = Some(value);
        } else {
            return Err(AppError::shape(
                "zillow apiCache",
                format!("unexpected key '{key}'"),
            ));
        }
    }

    match (variant, full) {
        (Some(variant), Some(full)) => Ok((variant, full)),
        (None, _) => Err(AppError::shape("zillow apiCache", "no Variant entry")),
        (_, None) => Err(AppError::shape("zillow apiCache", "no Full entry")),
    }
}

/// Parse the Next.js hydration blob.
pub fn next_data(document: &Html) -> Result<Value> {
    script_json(document, NEXT_DATA_ID)
}

/// `props.initialData` and `props.initialReduxState` of a `__NEXT_DATA__` blob.
pub fn initial_data_and_redux_state(next_data: &Value) -> Result<(Value, Value)> {
    let data = at(next_data, "/props/initialData", "zillow next data")?.clone();
    let redux = next_data
        .pointer("/props/initialReduxState")
        .cloned()
        .unwrap_or(Value::Null);
    Ok((data, redux))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkScore {
    pub walkscore: Option<f64>,
    pub description: Option<String>,
    pub ws_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitScore {
    pub transit_score: Option<f64>,
    pub description: Option<String>,
    pub ws_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeScore {
    pub bikescore: Option<f64>,
    pub description: Option<String>,
}

/// Walk, transit and bike scores for a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkAndBikeScore {
    #[serde(default)]
    pub walk_score: Option<WalkScore>,
    #[serde(default)]
    pub transit_score: Option<TransitScore>,
    #[serde(default)]
    pub bike_score: Option<BikeScore>,
}

/// Build the GraphQL POST for a property's walk and bike scores.
pub fn walk_and_bike_score_request(
    client: &Client,
    zpid: &str,
) -> Result<reqwest::blocking::RequestBuilder> {
    let operation = "WalkTransitAndBikeScoreQuery";
    let payload = json!({
        "clientVersion": defaults::GRAPHQL_CLIENT_VERSION,
        "operationName": operation,
        "query": defaults::WALK_AND_BIKE_SCORE_QUERY,
        "variables": {"zpid": zpid},
    });

    Ok(client
        .post(defaults::GRAPHQL_URL)
        .query(&[("zpid", zpid), ("operationName", operation)])
        .headers(header_map(defaults::GRAPHQL_HEADERS)?)
        .json(&payload))
}

/// Fetch walk, transit and bike scores through Zillow's GraphQL API.
pub fn fetch_walk_and_bike_score(client: &Client, zpid: &str) -> Result<WalkAndBikeScore> {
    log::debug!("Fetching walk and bike score for zpid {zpid}");
    let response = send_json(walk_and_bike_score_request(client, zpid)?)?;
    take(&response, "/data/property", "zillow walk score")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_client;

    fn preload_page(cache: &Value) -> Html {
        let preload = json!({
            "queryState": {},
            "apiCache": cache.to_string(),
        });
        Html::parse_document(&format!(
            r#"<html><body><script id="hdpApolloPreloadedData" type="application/json">{preload}</script></body></html>"#
        ))
    }

    #[test]
    fn test_api_preload_decodes_cache() {
        let cache = json!({
            "VariantQuery{\"zpid\":1}": {"property": {"zpid": 1}},
            "ForSaleShopperPlatformFullRenderQuery{\"zpid\":1}": {"property": {"zpid": 1, "price": 5}},
        });
        let preload = api_preload(&preload_page(&cache)).unwrap();
        assert!(preload["apiCache"].is_object());

        let (variant, full) = split_api_cache(preload).unwrap();
        assert_eq!(variant["property"]["zpid"], 1);
        assert_eq!(full["property"]["price"], 5);
    }

    #[test]
    fn test_split_rejects_unexpected_key() {
        let cache = json!({
            "VariantQuery": {},
            "FullRenderQuery": {},
            "SomethingElse": {},
        });
        let preload = api_preload(&preload_page(&cache)).unwrap();
        assert!(matches!(
            split_api_cache(preload),
            Err(AppError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_split_requires_both_entries() {
        let cache = json!({"VariantQuery": {}});
        let preload = api_preload(&preload_page(&cache)).unwrap();
        assert!(split_api_cache(preload).is_err());
    }

    #[test]
    fn test_missing_preload_script() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(matches!(
            api_preload(&document),
            Err(AppError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_initial_data_and_redux_state() {
        let data = json!({
            "props": {
                "initialData": {"building": {"buildingName": "The Lofts"}},
                "initialReduxState": {"gdp": {}},
            }
        });
        let (initial, redux) = initial_data_and_redux_state(&data).unwrap();
        assert_eq!(initial["building"]["buildingName"], "The Lofts");
        assert!(redux["gdp"].is_object());

        assert!(initial_data_and_redux_state(&json!({"props": {}})).is_err());
    }

    #[test]
    fn test_walk_score_request_shape() {
        let client = create_client(&HttpConfig::default()).unwrap();
        let request = walk_and_bike_score_request(&client, "123")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/graphql");
        assert_eq!(request.headers()["client-id"], "vertical-living");

        let body: Value =
            serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body["variables"]["zpid"], "123");
        assert_eq!(body["operationName"], "WalkTransitAndBikeScoreQuery");
    }

    #[test]
    fn test_walk_score_deserialize() {
        let response = json!({"data": {"property": {
            "id": "1",
            "walkScore": {"walkscore": 42, "description": "Car-Dependent", "ws_link": "x"},
            "transitScore": null,
            "bikeScore": {"bikescore": 55, "description": "Bikeable"},
        }}});
        let scores: WalkAndBikeScore = take(&response, "/data/property", "test").unwrap();
        assert_eq!(scores.walk_score.unwrap().walkscore, Some(42.0));
        assert!(scores.transit_score.is_none());
        assert_eq!(scores.bike_score.unwrap().description.as_deref(), Some("Bikeable"));
    }
}
