// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting.
//!
//! Timestamps are stored as RFC3339 UTC strings with millisecond precision.
//! Fixed-width formatting keeps lexicographic string comparison equivalent to
//! chronological comparison, which the Firestore range filters rely on.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error::AppError;

/// Format a UTC timestamp as RFC3339 with milliseconds and a `Z` suffix.
pub fn format_utc_millis(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in the stored timestamp format.
pub fn now_utc_millis() -> String {
    format_utc_millis(Utc::now())
}

/// Inclusive day window [00:00:00.000, 23:59:59.999] for a calendar date,
/// in the stored timestamp format.
pub fn day_bounds(date: NaiveDate) -> (String, String) {
    let start = date.and_hms_milli_opt(0, 0, 0, 0).unwrap_or_default().and_utc();
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_default()
        .and_utc();
    (format_utc_millis(start), format_utc_millis(end))
}

/// Parse a `YYYY-MM-DD` path/query parameter.
pub fn parse_date_param(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date: expected YYYY-MM-DD".to_string()))
}

/// Parse a stored RFC3339 timestamp back into a UTC datetime.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest("Invalid timestamp: expected RFC3339".to_string()))
}
