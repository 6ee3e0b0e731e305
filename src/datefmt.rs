//! Brazilian Portuguese date rendering for the PDF report.
//!
//! Inputs are the raw values of `datetime-local` inputs (`YYYY-MM-DDTHH:MM`,
//! optionally with seconds and fractions) or plain dates.

use chrono::{NaiveDate, NaiveDateTime};

/// Text printed for values that cannot be parsed.
pub const INVALID_DATE: &str = "Data inválida";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a form timestamp.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Formats `raw` as `DD/MM/YYYY, HH:MM:SS`.
pub fn format_date_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|value| value.format("%d/%m/%Y, %H:%M:%S").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_owned())
}

/// Formats `raw` as `DD/MM/YYYY`.
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|value| value.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_owned())
}
