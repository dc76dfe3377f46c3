//! Human-readable summaries of Koleo records.
//!
//! Pure functions, no I/O, no failure paths: a missing or malformed
//! field degrades to a placeholder ("?", "N/A", blank) instead of an
//! error. Default substitution is centralized here rather than at call
//! sites.

pub mod board;
pub mod connections;
pub mod trains;

/// First 16 characters of an ISO timestamp: `YYYY-MM-DD HH:MM`.
///
/// Falls back to the full value for anything shorter (or anything with a
/// non-ASCII boundary there).
pub(crate) fn clip_minute(value: &str) -> &str {
    value.get(..16).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_minute_takes_date_and_minute() {
        assert_eq!(clip_minute("2024-01-15 10:30:00"), "2024-01-15 10:30");
        assert_eq!(clip_minute("2024-01-15T10:30:00+01:00"), "2024-01-15T10:30");
        assert_eq!(clip_minute("short"), "short");
        assert_eq!(clip_minute(""), "");
    }
}
