//! Canonical calendar-day text helpers.
//!
//! # Responsibility
//! - Convert between `NaiveDate` and the `YYYYMMDD` wire/storage format.
//! - Reduce a reference instant to the calendar day that rules compare with.
//!
//! # Invariants
//! - Only exactly eight ASCII digits forming a valid Gregorian day parse.
//! - Formatting and parsing are inverse for every date in years 0..=9999.

use chrono::{Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// `chrono` pattern for the canonical date text.
pub const DATE_FORMAT: &str = "%Y%m%d";

static CANONICAL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("valid canonical date regex"));

/// Parses canonical `YYYYMMDD` text.
///
/// Returns `None` for any other shape (separators, short fields, signs,
/// surrounding whitespace) and for impossible days such as `20230229`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if !CANONICAL_DATE_RE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Formats a day as canonical `YYYYMMDD` text.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Returns whether `text` is a canonical date.
pub fn is_canonical_date(text: &str) -> bool {
    parse_date(text).is_some()
}

/// Current local wall-clock instant.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::{format_date, is_canonical_date, parse_date};
    use chrono::NaiveDate;

    #[test]
    fn parses_canonical_text() {
        assert_eq!(
            parse_date("20240115"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn rejects_non_canonical_shapes() {
        for text in ["2024115", "2024-01-15", " 20240115", "+2024011", "", "202401150"] {
            assert!(parse_date(text).is_none(), "`{text}` must be rejected");
        }
    }

    #[test]
    fn rejects_impossible_days() {
        assert!(!is_canonical_date("20230229"));
        assert!(!is_canonical_date("20241301"));
        assert!(is_canonical_date("20240229"));
    }

    #[test]
    fn format_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
        assert_eq!(format_date(date), "20240305");
    }
}
