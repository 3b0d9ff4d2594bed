//! Date parsing and formatting for issue publication dates.
//!
//! Backends hand back dates in several shapes: bare `YYYY-MM-DD` literals from
//! relationships and MODS, full ISO 8601 timestamps from the search index, and
//! occasionally naive timestamps without an offset. All of them are read into a
//! UTC timestamp; dates without a time component land on midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{NewspaperError, Result};

/// Format used whenever a date is written back to the store.
pub const ISSUE_DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a date string into a UTC timestamp.
///
/// # Errors
///
/// Returns [`NewspaperError::InvalidDate`] if the string matches none of the
/// accepted shapes.
pub fn parse_issue_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, ISSUE_DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|e| NewspaperError::InvalidDate(format!("'{value}': {e}")))
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_issue_date(date: NaiveDate) -> String {
    date.format(ISSUE_DATE_FORMAT).to_string()
}
