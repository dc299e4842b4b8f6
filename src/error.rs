// src/error.rs

//! Unified error handling for the scraping library.

use std::fmt;

use thiserror::Error;

/// Result type alias for realty operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed or returned a non-success status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed, or a field did not have the expected type
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// An expected element was not present in the page
    #[error("Element not found: {selector}")]
    MissingElement { selector: String },

    /// The page or API response did not have the expected structure
    #[error("Unexpected data shape in {context}: {message}")]
    UnexpectedShape { context: String, message: String },

    /// A listing record is missing required keys
    #[error("Listing is missing the following keys: {}", keys.join(", "))]
    MissingKeys { keys: Vec<String> },

    /// Listing status is neither FOR_SALE nor FOR_RENT
    #[error("Status type should be either FOR_RENT or FOR_SALE, was {0}")]
    InvalidStatus(String),

    /// Detail URL does not match any known listing page layout
    #[error("Unsupported listing URL: {0}")]
    UnsupportedUrl(String),

    /// A caller-supplied argument was rejected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a missing element error.
    pub fn missing(selector: impl Into<String>) -> Self {
        Self::MissingElement {
            selector: selector.into(),
        }
    }

    /// Create an unexpected shape error with context.
    pub fn shape(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::UnexpectedShape {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid(message: impl fmt::Display) -> Self {
        Self::InvalidArgument(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_message_lists_keys() {
        let err = AppError::MissingKeys {
            keys: vec!["price".into(), "zip".into()],
        };
        assert_eq!(
            err.to_string(),
            "Listing is missing the following keys: price, zip"
        );
    }

    #[test]
    fn test_shape_helper() {
        let err = AppError::shape("zillow search", "listResults missing");
        assert!(matches!(err, AppError::UnexpectedShape { .. }));
        assert!(err.to_string().contains("zillow search"));
    }
}
