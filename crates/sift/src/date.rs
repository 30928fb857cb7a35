//! Date parsing for date operators and query parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive layouts accepted for date strings, after RFC 3339.
///
/// Ambiguous day/month strings resolve to the first layout that parses, so
/// `03/04/2024` is March 4th and `25/12/2024` falls through to day-first.
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

const DATETIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a date string held in a record field.
///
/// Tries RFC 3339, then `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`, `MM/DD/YYYY`
/// and `DD/MM/YYYY`. Naive forms are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, DATETIME_LAYOUT) {
        return Some(parsed.and_utc());
    }
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Parses a timestamp from query parameter text.
///
/// Accepts RFC 3339 or a bare `YYYY-MM-DD` date at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
