//! Date and timestamp conversion between stored, input and display forms

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Calendar date format for database storage
pub const DB_DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for database storage
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format shown in listings and accepted for free-text entry
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Convert a date to database string format
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DB_DATE_FORMAT).to_string()
}

/// Parse a stored calendar date (`yyyy-mm-dd`)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DB_DATE_FORMAT).ok()
}

/// Parse a free-text `dd/mm/yyyy` date
pub fn parse_display_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DISPLAY_DATE_FORMAT).ok()
}

/// Parse a date typed by the operator, in either `yyyy-mm-dd` or `dd/mm/yyyy`
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    parse_date(s).or_else(|| parse_display_date(s))
}

/// Format a date for display (`dd/mm/yyyy`)
pub fn format_display_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Render a stored date for display; unparseable values are shown as-is
pub fn display_stored_date(s: &str) -> String {
    match normalize_stored_date(s) {
        Some(date) => format_display_date(&date),
        None => s.to_string(),
    }
}

/// Convert a timestamp to database string format
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

/// Current local timestamp formatted for database
pub fn now_timestamp() -> String {
    format_timestamp(&Local::now().naive_local())
}

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Interpret any date shape older rows may hold: `yyyy-mm-dd`,
/// `dd/mm/yyyy`, or a full timestamp (date part kept).
pub fn normalize_stored_date(s: &str) -> Option<NaiveDate> {
    parse_date(s)
        .or_else(|| parse_display_date(s))
        .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
}
