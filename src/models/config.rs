//! Library configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Detail scraping behavior
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if !self.scrape.jitter.is_finite() || self.scrape.jitter < 0.0 {
            return Err(AppError::validation(
                "scrape.jitter must be a finite number >= 0",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests.
    ///
    /// Site header tables carry their own browser agent; this one applies to
    /// requests sent without a site table (noise and loan lookups).
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Pause settings for eager multi-listing scrapes.
///
/// Before each detail fetch after the first, the scraper sleeps for
/// `delay_ms * U(0, 1) * jitter` milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Base delay between detail fetches in milliseconds
    #[serde(default)]
    pub delay_ms: u64,

    /// Multiplier applied to the randomized delay
    #[serde(default = "defaults::jitter")]
    pub jitter: f64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            jitter: defaults::jitter(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn jitter() -> f64 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_jitter() {
        let mut config = Config::default();
        config.scrape.jitter = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scrape]\ndelay_ms = 1500").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scrape.delay_ms, 1500);
        assert_eq!(config.scrape.jitter, 1.0);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.scrape.delay_ms, 0);
    }

    #[test]
    fn load_rejects_wrong_types() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\ntimeout_secs = \"soon\"").unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(AppError::Toml(_))
        ));
    }
}
