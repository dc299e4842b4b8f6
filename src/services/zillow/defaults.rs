//! Zillow endpoints and request headers.
//!
//! Zillow only answers requests that look like they came from its own web
//! client, so these tables mirror what a browser sends.

/// Site root, used to resolve relative detail URLs.
pub const BASE_URL: &str = "https://www.zillow.com";

/// Search API endpoint.
pub const SEARCH_URL: &str = "https://www.zillow.com/search/GetSearchPageState.htm";

/// GraphQL endpoint used by detail-page widgets.
pub const GRAPHQL_URL: &str = "https://www.zillow.com/graphql";

/// Headers for search and detail page requests.
pub const HEADERS: &[(&str, &str)] = &[
    ("authority", "www.zillow.com"),
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

/// Headers for GraphQL POST requests.
pub const GRAPHQL_HEADERS: &[(&str, &str)] = &[
    ("authority", "www.zillow.com"),
    ("accept", "*/*"),
    ("accept-language", "en-US,en;q=0.7"),
    ("client-id", "vertical-living"),
    ("content-type", "application/json"),
    ("origin", "https://www.zillow.com"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("sec-gpc", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
    ),
];

/// Client version string sent with GraphQL requests.
pub const GRAPHQL_CLIENT_VERSION: &str = "home-details/6.1.1569.master.099cd8a";

/// Walk, transit and bike score query for a property.
pub const WALK_AND_BIKE_SCORE_QUERY: &str = "query WalkTransitAndBikeScoreQuery($zpid: ID!) {\n  property(zpid: $zpid) {\n    id\n    walkScore {\n      walkscore\n      description\n      ws_link\n    }\n    transitScore {\n      transit_score\n      description\n      ws_link\n    }\n    bikeScore {\n      bikescore\n      description\n    }\n  }\n}\n";

/// Fallback annual interest rate when the listing has no 30-year fixed rate.
pub const FALLBACK_INTEREST_RATE: f64 = 0.06;

/// Zillow's home insurance estimate as a fraction of the price.
pub const HOME_INSURANCE_RATE: f64 = 0.0042;
