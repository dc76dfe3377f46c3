//! Date and time normalization for the Koleo API.
//!
//! Koleo exchanges timestamps as local-wall-clock ISO strings, so the
//! whole crate works in `NaiveDateTime` (no offsets attached). This
//! module parses user-supplied datetimes, parses remote-returned
//! timestamps, and renders the four formats the API and the koleo.pl
//! URLs expect.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Error returned when a user-supplied datetime cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid datetime: {input}")]
pub struct InvalidDateTime {
    pub input: String,
}

/// Datetime grammars accepted from tool parameters, tried in order.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an optional user-supplied datetime string.
///
/// Absent or blank input means "now" (local wall clock). Otherwise the
/// input must parse as an unambiguous calendar date plus time: RFC 3339,
/// `YYYY-MM-DD[T ]HH:MM[:SS]`, or a bare `YYYY-MM-DD` (taken at
/// midnight). Anything else is rejected with [`InvalidDateTime`].
pub fn parse_date_time(input: Option<&str>) -> Result<NaiveDateTime, InvalidDateTime> {
    let Some(raw) = input else {
        return Ok(Local::now().naive_local());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Local::now().naive_local());
    }

    parse_flexible(trimmed).ok_or_else(|| InvalidDateTime {
        input: raw.to_string(),
    })
}

/// Parse a timestamp returned by the remote service.
///
/// Tolerant variant used where the remote value is data rather than a
/// parameter: returns `None` instead of an error so callers can degrade
/// gracefully.
pub fn parse_api_datetime(value: &str) -> Option<NaiveDateTime> {
    parse_flexible(value.trim())
}

fn parse_flexible(s: &str) -> Option<NaiveDateTime> {
    // RFC 3339 carries an offset; keep the wall-clock time as written.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for format in INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    // Bare date: midnight.
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

/// `YYYY-MM-DD`, as used in timetable URL paths.
pub fn format_ymd(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DDTHH:MM`.
///
/// Used as a cutoff for lexical comparison against remote-returned ISO
/// timestamps; this only works because both sides use zero-padded
/// fixed-width fields.
pub fn format_iso_minute(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M").to_string()
}

/// `YYYY-MM-DD HH:MM`, for display text.
pub fn format_ymd_hm(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// `DD-MM-YYYY_HH:MM`, the koleo.pl URL-path form.
pub fn format_dmy_hm(dt: NaiveDateTime) -> String {
    dt.format("%d-%m-%Y_%H:%M").to_string()
}

/// A wall-clock time without a date.
///
/// Some endpoints return bare `{hour, minute, second?}` structures that
/// must be combined with a caller-supplied base date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<u32>,
}

impl TimeOfDay {
    /// Combine with a calendar date. Second defaults to 0.
    ///
    /// Returns `None` when the components are out of range.
    pub fn on_date(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        date.and_hms_opt(self.hour, self.minute, self.second.unwrap_or(0))
    }

    /// Render as `HH:MM`.
    pub fn display_hm(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}
