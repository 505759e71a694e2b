//! Date localization used by the variable substitution stage
//!
//! The renderer only sees the [`DateFormatter`] trait; the default
//! implementation converts ISO dates into the Brazilian `dd/mm/yyyy` form
//! used throughout generated contracts.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// ISO calendar date, optionally followed by a time component
static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:[T ].*)?$").expect("Valid regex pattern")
});

/// Already-localized `dd/mm/yyyy`
static LOCAL_DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("Valid regex pattern"));

const LOCAL_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("'{input}' looks like a date but is not a valid calendar day")]
    InvalidCalendarDate { input: String },

    #[error("{0}")]
    Other(String),
}

/// Converts a raw field value into its localized date text.
pub trait DateFormatter: Send + Sync {
    fn format(&self, raw: &str) -> Result<String, DateFormatError>;
}

/// Default formatter: `2024-01-05` (or `2024-01-05T10:00:00Z`) becomes `05/01/2024`.
///
/// Inputs already in `dd/mm/yyyy` and anything that does not look like an ISO
/// date are returned unchanged. An ISO-shaped value naming a day that does not
/// exist (`2024-02-30`) is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrazilianDateFormatter;

impl DateFormatter for BrazilianDateFormatter {
    fn format(&self, raw: &str) -> Result<String, DateFormatError> {
        let trimmed = raw.trim();

        if LOCAL_DATE_REGEX.is_match(trimmed) {
            return Ok(trimmed.to_string());
        }

        let Some(caps) = ISO_DATE_REGEX.captures(trimmed) else {
            return Ok(raw.to_string());
        };

        NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d")
            .map(|date| date.format(LOCAL_DATE_FORMAT).to_string())
            .map_err(|_| DateFormatError::InvalidCalendarDate {
                input: raw.to_string(),
            })
    }
}

/// Formats with [`BrazilianDateFormatter`], returning the input on failure.
pub fn to_local_date(raw: &str) -> String {
    BrazilianDateFormatter
        .format(raw)
        .unwrap_or_else(|_| raw.to_string())
}

/// Today's date in the local `dd/mm/yyyy` form
pub fn today_local() -> String {
    Local::now().date_naive().format(LOCAL_DATE_FORMAT).to_string()
}
