// SPDX-License-Identifier: MIT

//! Shared helpers for date/time handling.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as an RFC3339 string, the format used for stored timestamps.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Parse a `YYYY-MM-DD` path segment. `None` for anything else, including
/// unpadded forms the parser would otherwise accept.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    if date.format("%Y-%m-%d").to_string() != s {
        return None;
    }
    Some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        assert!(parse_day("2024-01-01").is_some());
        assert!(parse_day("2024-1-1").is_none());
        assert!(parse_day("01-01-2024").is_none());
        assert!(parse_day("not-a-date").is_none());
    }
}
