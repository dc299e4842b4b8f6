//! JSON navigation helpers.
//!
//! Sites embed deeply nested JSON; these helpers walk it with JSON pointers
//! and deserialize typed sub-trees so that a missing key or a field of the
//! wrong type surfaces as an error naming where it happened.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Borrow the value at `pointer`, failing if it is absent or `null`.
pub fn at<'a>(value: &'a Value, pointer: &str, context: &str) -> Result<&'a Value> {
    match value.pointer(pointer) {
        Some(Value::Null) | None => Err(AppError::shape(context, format!("{pointer} not found"))),
        Some(found) => Ok(found),
    }
}

/// Deserialize the value at `pointer` into `T`.
pub fn take<T: DeserializeOwned>(value: &Value, pointer: &str, context: &str) -> Result<T> {
    let found = at(value, pointer, context)?;
    T::deserialize(found).map_err(|e| AppError::shape(format!("{context} {pointer}"), e))
}

/// Parse a JSON document that was itself stored as a string inside JSON.
pub fn embedded(value: &Value, pointer: &str, context: &str) -> Result<Value> {
    let raw = at(value, pointer, context)?
        .as_str()
        .ok_or_else(|| AppError::shape(context, format!("{pointer} is not a string")))?;
    Ok(serde_json::from_str(raw)?)
}

/// Treat an explicit `null` like a missing field.
pub fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept an identifier that may be serialized as either a string or a number.
pub fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}

/// Optional variant of [`string_or_number`].
pub fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrap>::deserialize(deserializer)?.map(|Wrap(s)| s))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Home {
        #[serde(deserialize_with = "string_or_number")]
        zpid: String,
        beds: Option<u32>,
    }

    #[test]
    fn test_at_missing_and_null() {
        let value = json!({"props": {"pageProps": null}});
        assert!(at(&value, "/props", "test").is_ok());
        assert!(at(&value, "/props/pageProps", "test").is_err());
        assert!(at(&value, "/props/missing", "test").is_err());
    }

    #[test]
    fn test_take_typed() {
        let value = json!({"home": {"zpid": 42, "beds": 3}});
        let home: Home = take(&value, "/home", "test").unwrap();
        assert_eq!(home.zpid, "42");
        assert_eq!(home.beds, Some(3));
    }

    #[test]
    fn test_take_wrong_type_is_error() {
        let value = json!({"home": {"zpid": "1", "beds": "three"}});
        let err = take::<Home>(&value, "/home", "test").unwrap_err();
        assert!(matches!(err, AppError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_null_default() {
        #[derive(Deserialize)]
        struct Facts {
            #[serde(default, deserialize_with = "null_default")]
            appliances: Vec<String>,
        }

        let null: Facts = serde_json::from_value(json!({"appliances": null})).unwrap();
        let missing: Facts = serde_json::from_value(json!({})).unwrap();
        let present: Facts = serde_json::from_value(json!({"appliances": ["Range"]})).unwrap();

        assert!(null.appliances.is_empty());
        assert!(missing.appliances.is_empty());
        assert_eq!(present.appliances, vec!["Range"]);
    }

    #[test]
    fn test_embedded() {
        let value = json!({"apiCache": "{\"a\": {\"b\": 2}}"});
        let inner = embedded(&value, "/apiCache", "test").unwrap();
        assert_eq!(inner["a"]["b"], 2);

        let not_string = json!({"apiCache": {}});
        assert!(embedded(&not_string, "/apiCache", "test").is_err());
    }
}
