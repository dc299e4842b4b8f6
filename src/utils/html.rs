//! HTML extraction helpers.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Text content of the first element matching `selector`, whitespace-trimmed.
pub fn select_text(document: &Html, selector: &str) -> Result<Option<String>> {
    let sel = parse_selector(selector)?;
    Ok(document
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string()))
}

/// Find `script#<id>` and parse its contents as JSON.
///
/// Used for the data blobs sites embed for client-side hydration, such as
/// `__NEXT_DATA__`.
pub fn script_json(document: &Html, id: &str) -> Result<Value> {
    let selector = format!("script#{id}");
    let text = select_text(document, &selector)?.ok_or_else(|| AppError::missing(&selector))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("script#__NEXT_DATA__").is_ok());
        assert!(parse_selector("p.kHeRng").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(matches!(
            parse_selector("[[invalid"),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn test_script_json() {
        let document = Html::parse_document(
            r#"<html><body>
                <script id="__NEXT_DATA__" type="application/json">{"props": {"a": 1}}</script>
            </body></html>"#,
        );
        let data = script_json(&document, "__NEXT_DATA__").unwrap();
        assert_eq!(data["props"]["a"], 1);
    }

    #[test]
    fn test_script_json_missing() {
        let document = Html::parse_document("<html><body><p>blocked</p></body></html>");
        let err = script_json(&document, "__NEXT_DATA__").unwrap_err();
        assert!(matches!(err, AppError::MissingElement { selector } if selector == "script#__NEXT_DATA__"));
    }

    #[test]
    fn test_script_json_malformed() {
        let document =
            Html::parse_document(r#"<script id="__NEXT_DATA__">{"props": </script>"#);
        assert!(matches!(
            script_json(&document, "__NEXT_DATA__"),
            Err(AppError::Json(_))
        ));
    }

    #[test]
    fn test_select_text_trims() {
        let document = Html::parse_document("<p class=\"note\">\n  Likely to sell faster\n</p>");
        assert_eq!(
            select_text(&document, "p.note").unwrap(),
            Some("Likely to sell faster".to_string())
        );
    }
}
