//! Realtor.com endpoints, headers and default payloads.

use serde_json::{Value, json};

/// Listing search endpoint.
pub const SEARCH_URL: &str = "https://www.realtor.com/api/v1/hulk_main_srp";

/// GraphQL endpoint for per-property lookups such as flood and fire risk.
pub const HULK_URL: &str = "https://www.realtor.com/api/v1/hulk";

/// Mortgage payment calculator.
pub const LOAN_URL: &str = "https://www.realtor.com/api/v1/payments/calculate_property_loan";

/// Noise level lookup by coordinates.
pub const NOISE_URL: &str = "https://www.realtor.com/api/v1/maps/gstat/noise";

/// Search results carry a permalink that is appended to this prefix.
pub const DETAIL_URL_PREFIX: &str = "https://www.realtor.com/realestateandhomes-detail/";

/// Query parameters sent with every GraphQL POST.
pub const POST_PARAMS: &[(&str, &str)] = &[("client_id", "rdc-x"), ("schema", "vesta")];

/// Default page size, matching the site.
pub const DEFAULT_LIMIT: u32 = 42;

pub const HEADERS: &[(&str, &str)] = &[
    ("authority", "www.realtor.com"),
    ("accept", "*/*"),
    ("accept-language", "en-US,en;q=0.9"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("sec-gpc", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36",
    ),
];

pub const GRAPHQL_HEADERS: &[(&str, &str)] = &[
    ("authority", "www.realtor.com"),
    ("accept", "application/json"),
    ("accept-language", "en-US,en;q=0.9"),
    ("content-type", "application/json"),
    ("origin", "https://www.realtor.com"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("sec-gpc", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
    ),
];

/// Search query used by the site's result pages.
///
/// Variables: `query` (filter criteria), `limit`, `offset`, `sort` or
/// `sort_type`, `client_data` and `bucket`.
pub const GRAPHQL_LISTING_SEARCH_QUERY: &str = r#"query ConsumerSearchMainQuery(
  $query: HomeSearchCriteria!
  $limit: Int
  $offset: Int
  $sort: [SearchAPISort]
  $sort_type: SearchSortType
  $client_data: JSON
  $bucket: SearchAPIBucket
) {
  home_search: home_search(
    query: $query
    sort: $sort
    limit: $limit
    offset: $offset
    sort_type: $sort_type
    client_data: $client_data
    bucket: $bucket
  ) {
    count
    total
    results {
      property_id
      list_price
      primary
      primary_photo(https: true) {
        href
      }
      source {
        id
        agents {
          office_name
        }
        type
        spec_id
        plan_id
      }
      community {
        property_id
        description {
          name
        }
        advertisers {
          office {
            hours
            phones {
              type
              number
            }
          }
          builder {
            fulfillment_id
          }
        }
      }
      products {
        brand_name
        products
      }
      listing_id
      matterport
      virtual_tours {
        href
        type
      }
      status
      permalink
      price_reduced_amount
      other_listings {
        rdc {
          listing_id
          status
          listing_key
          primary
        }
      }
      description {
        beds
        baths
        baths_full
        baths_half
        baths_1qtr
        baths_3qtr
        garage
        stories
        type
        sub_type
        lot_sqft
        sqft
        year_built
        sold_price
        sold_date
        name
      }
      location {
        street_view_url
        address {
          line
          postal_code
          state
          state_code
          city
          coordinate {
            lat
            lon
          }
        }
        county {
          name
          fips_code
        }
      }
      tax_record {
        public_record_id
      }
      lead_attributes {
        show_contact_an_agent
        opcity_lead_attributes {
          cashback_enabled
          flip_the_market_enabled
        }
        lead_type
        ready_connect_mortgage {
          show_contact_a_lender
          show_veterans_united
        }
      }
      open_houses {
        start_date
        end_date
        description
        methods
        time_zone
        dst
      }
      flags {
        is_coming_soon
        is_pending
        is_foreclosure
        is_contingent
        is_new_construction
        is_new_listing(days: 14)
        is_price_reduced(days: 30)
        is_plan
        is_subdivision
      }
      list_date
      last_update_date
      coming_soon_date
      photos(limit: 2, https: true) {
        href
      }
      tags
      branding {
        type
        photo
        name
      }
    }
  }
}
"#;

pub const FLOOD_RISK_QUERY: &str = "query GetLocalData($propertyId: ID!) {  home(property_id: $propertyId) {    local {      flood {        fsid        flood_factor_score        flood_factor_severity        flood_cumulative_30        flood_trend        flood_trend_paragraph        fema_zone        firststreet_url        flood_insurance_text        environmental_risk      trend_direction      insurance_requirement      insurance_rates {          provider_logo          provider_url          providers        }        insurance_quotes {          provider_name          provider_url          provider_logo          expires          price          home_coverage          contents_coverage          disclaimer        }      }    }  }}";

pub const FIRE_RISK_QUERY: &str = "query GetLocalData($propertyId: ID!) {  home(property_id: $propertyId) {    local {      wildfire {        fsid        fire_factor_score        fire_factor_severity        fire_cumulative_30        fire_trend        fire_trend_paragraph        usfs_relative_risk        firststreet_url        fire_insurance_text        insurance_rates {          provider_logo          provider_url          providers        }      }    }  }}";

/// Request body for a listing search, minus the filter criteria.
pub fn listing_search_payload() -> Value {
    json!({
        "query": GRAPHQL_LISTING_SEARCH_QUERY,
        "variables": {
            "query": {},
            "client_data": default_client_data(),
            "limit": DEFAULT_LIMIT,
            "offset": 0,
            "sort_type": "relevant",
        },
        "operationName": "ConsumerSearchMainQuery",
        "callfrom": "SRP",
        "nrQueryType": "MAIN_SRP",
        "isClient": true,
    })
}

/// The search API rejects requests without this.
pub fn default_client_data() -> Value {
    json!({"device_data": {"device_type": "web"}, "user_data": {}})
}
