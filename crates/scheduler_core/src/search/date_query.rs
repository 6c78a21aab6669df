//! Search-date recognition and conversion.
//!
//! A search string is treated as a date only when it has the exact shape
//! `DD.MM.YYYY`: ten bytes, dots at offsets 2 and 5, integer parts, day in
//! `1..=31` and month in `1..=12`. Calendar validity is not checked, so
//! `31.02.2024` is still a date search.

use std::error::Error;
use std::fmt::{Display, Formatter};

const SEARCH_DATE_LEN: usize = 10;

/// Storage-level filter derived from list/search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    /// No search input: upcoming tasks.
    Upcoming,
    /// Tasks due on one canonical `YYYYMMDD` day.
    OnDate(String),
    /// Substring match on title or comment.
    Text(String),
}

/// Search date cannot be converted to canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDateError(pub String);

impl Display for SearchDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid search date `{}`: expected DD.MM.YYYY", self.0)
    }
}

impl Error for SearchDateError {}

impl TaskFilter {
    /// Classifies raw search input.
    ///
    /// Blank input lists upcoming tasks; a valid search date filters by day;
    /// anything else, including a padded date, is a text search.
    pub fn from_search(input: &str) -> Result<Self, SearchDateError> {
        if input.trim().is_empty() {
            return Ok(Self::Upcoming);
        }
        if is_search_date(input) {
            return search_date_to_db(input).map(Self::OnDate);
        }
        Ok(Self::Text(input.to_string()))
    }
}

/// Returns whether `text` has the `DD.MM.YYYY` search-date shape.
pub fn is_search_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != SEARCH_DATE_LEN || bytes[2] != b'.' || bytes[5] != b'.' {
        return false;
    }

    let parts = text.split('.').collect::<Vec<_>>();
    let [day, month, year] = parts.as_slice() else {
        return false;
    };
    let (Ok(day), Ok(month), Ok(_year)) =
        (day.parse::<i32>(), month.parse::<i32>(), year.parse::<i32>())
    else {
        return false;
    };

    (1..=31).contains(&day) && (1..=12).contains(&month)
}

/// Converts `D.M.YYYY` / `DD.MM.YYYY` into canonical `YYYYMMDD`.
///
/// Single-digit day and month are left-padded with `0`. The parts are not
/// range-checked here; pair with [`is_search_date`] for validation.
pub fn search_date_to_db(text: &str) -> Result<String, SearchDateError> {
    let parts = text.split('.').collect::<Vec<_>>();
    let [day, month, year] = parts.as_slice() else {
        return Err(SearchDateError(text.to_string()));
    };
    Ok(format!("{year}{}{}", pad_two(month), pad_two(day)))
}

fn pad_two(part: &str) -> String {
    if part.len() == 1 {
        format!("0{part}")
    } else {
        part.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_search_date, search_date_to_db, SearchDateError, TaskFilter};

    #[test]
    fn accepts_dotted_day_month_year() {
        assert!(is_search_date("15.01.2024"));
        assert!(is_search_date("31.02.2024"));
    }

    #[test]
    fn rejects_wrong_shapes_and_ranges() {
        for text in ["2024.01.15", "5.1.2024", "15-01-2024", "00.01.2024", "15.13.2024", "aa.01.2024"] {
            assert!(!is_search_date(text), "`{text}` must not be a search date");
        }
    }

    #[test]
    fn converts_and_pads_to_canonical_form() {
        assert_eq!(search_date_to_db("15.01.2024").as_deref(), Ok("20240115"));
        assert_eq!(search_date_to_db("5.1.2024").as_deref(), Ok("20240105"));
        assert_eq!(search_date_to_db("03.08.2025").as_deref(), Ok("20250803"));
        assert_eq!(
            search_date_to_db("15/01/2024"),
            Err(SearchDateError("15/01/2024".to_string()))
        );
    }

    #[test]
    fn classifies_search_input() {
        assert_eq!(TaskFilter::from_search("  "), Ok(TaskFilter::Upcoming));
        assert_eq!(
            TaskFilter::from_search("08.03.2025"),
            Ok(TaskFilter::OnDate("20250308".to_string()))
        );
        assert_eq!(
            TaskFilter::from_search("5.1.2024"),
            Ok(TaskFilter::Text("5.1.2024".to_string()))
        );
    }

    #[test]
    fn padded_date_is_a_text_search() {
        assert_eq!(
            TaskFilter::from_search(" 15.01.2024"),
            Ok(TaskFilter::Text(" 15.01.2024".to_string()))
        );
        assert_eq!(
            TaskFilter::from_search("15.01.2024"),
            Ok(TaskFilter::OnDate("20240115".to_string()))
        );
    }
}
