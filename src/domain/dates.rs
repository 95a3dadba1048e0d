//! Lenient timestamp parsing for vendor payloads
//!
//! Vendors disagree on how they write dates: FHIR servers send full RFC 3339
//! instants, ClinicCloud sends calendar dates, OSCAR sends naive local
//! date-times. All of them become UTC instants at the canonical boundary.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a vendor date or date-time string into a UTC instant
///
/// Accepted forms: RFC 3339 (`2023-10-15T10:30:00Z`, with offset),
/// naive date-time (`2023-10-15T10:30:00`, `2023-10-15 10:30:00`),
/// and calendar date (`2023-10-15`, interpreted as midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format an instant as a calendar date (`YYYY-MM-DD`)
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}
