//! Utility functions and helpers.

pub mod html;
pub mod http;
pub mod json;
pub mod units;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve a URL string against a base URL string.
pub fn resolve(base_url: &str, href: &str) -> Option<String> {
    Url::parse(base_url)
        .ok()
        .map(|base| resolve_url(&base, href))
}

/// Lowercase a place or category name and join its words with `-`.
///
/// ```
/// use realty::utils::slugify;
///
/// assert_eq!(slugify("Hamilton  County"), "hamilton-county");
/// assert_eq!(slugify("Farms and Ranches"), "farms-and-ranches");
/// ```
pub fn slugify(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.zillow.com").unwrap();
        assert_eq!(
            resolve_url(&base, "/b/the-sterling-chattanooga-tn-5XjPvq/"),
            "https://www.zillow.com/b/the-sterling-chattanooga-tn-5XjPvq/"
        );
        assert_eq!(
            resolve_url(&base, "https://www.zillow.com/homedetails/1_zpid/"),
            "https://www.zillow.com/homedetails/1_zpid/"
        );
    }

    #[test]
    fn test_resolve_invalid_base() {
        assert_eq!(resolve("not a url", "/x"), None);
    }

    #[test]
    fn test_slugify_trims_and_collapses() {
        assert_eq!(slugify("  St. Louis "), "st.-louis");
        assert_eq!(slugify(""), "");
    }
}
