//! Conversions between the UTC timestamps kept in the database and the
//! timezone users read and type times in.

use crate::errors::app_error::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

pub fn to_display_time(utc: NaiveDateTime, zone: FixedOffset) -> DateTime<FixedOffset> {
    zone.from_utc_datetime(&utc)
}

pub fn format_display_time(utc: NaiveDateTime, zone: FixedOffset) -> String {
    to_display_time(utc, zone)
        .format("%Y-%m-%d %I:%M %p")
        .to_string()
}

/// Parses a departure time typed by a user.
///
/// Input carrying an offset (RFC 3339) is taken as is; naive input is read
/// as wall-clock time in `zone`. The result is always UTC.
pub fn parse_departure_time(input: &str, zone: FixedOffset) -> AppResult<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::validation("Departure time is required"));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.naive_utc());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|local| zone.from_local_datetime(&local).single())
        .map(|datetime| datetime.naive_utc())
        .ok_or_else(|| AppError::validation(format!("Could not understand departure time '{input}'")))
}
