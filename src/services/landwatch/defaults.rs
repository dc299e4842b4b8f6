//! LandWatch endpoints and request headers.

/// Site root; listing `canonicalUrl`s are relative to it.
pub const ROOT_URL: &str = "https://www.landwatch.com";

/// Search API. The filter path built by `Query` is appended to it.
pub const SEARCH_API_URL: &str = "https://www.landwatch.com/api/property/search/1113";

pub const HEADERS: &[(&str, &str)] = &[
    ("authority", "www.landwatch.com"),
    ("accept", "application/json, text/plain, */*"),
    ("accept-language", "en-US,en;q=0.9"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("sec-gpc", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
    ),
];
