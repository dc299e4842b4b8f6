//! Area and payment arithmetic.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, Result};

/// Square feet per acre.
pub const SQFT_PER_ACRE: f64 = 43_560.0;

/// Convert acres to square feet.
pub fn acres_to_sqft(acres: f64) -> f64 {
    acres * SQFT_PER_ACRE
}

fn lot_size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(\d[\d,]*(?:\.\d+)?|\.\d+)\s*(acres?|sq\.?\s*ft\.?|sqft|square\s+feet)\s*$")
            .expect("lot size pattern is valid")
    })
}

/// Parse a lot size string such as `"1.5 Acres"` or `"10,890 sqft"` into square feet.
pub fn parse_lot_size(lot_size: &str) -> Result<f64> {
    let caps = lot_size_pattern().captures(lot_size).ok_or_else(|| {
        AppError::invalid(format!(
            "expected lot size like '1.5 Acres' or '10,890 sqft', got '{lot_size}'"
        ))
    })?;

    let number: f64 = caps[1]
        .replace(',', "")
        .parse()
        .map_err(|e| AppError::invalid(format!("lot size number '{}': {e}", &caps[1])))?;

    if caps[2].to_ascii_lowercase().starts_with("acre") {
        Ok(acres_to_sqft(number))
    } else {
        Ok(number)
    }
}

/// Monthly payment on an amortised loan.
///
/// `monthly_rate` is the periodic rate as a fraction (5% a year is `0.05 / 12`).
pub fn monthly_mortgage(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }
    if monthly_rate == 0.0 {
        return principal / f64::from(months);
    }
    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * (monthly_rate * growth) / (growth - 1.0)
}
