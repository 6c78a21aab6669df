//! Next-occurrence evaluation for parsed repeat rules.
//!
//! # Invariants
//! - Every returned day is strictly after the reference day.
//! - `d` and `y` always advance `start` at least once, even when `start` is
//!   already in the future.
//! - A yearly anchor on February 29 lands on February 28 in common years;
//!   each occurrence is derived from the original anchor, so leap years get
//!   February 29 back.

use crate::model::date::{format_date, parse_date};
use crate::recurrence::rule::{RepeatRule, RuleError};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Upper bound of days scanned by the `w` rule.
pub const WEEKLY_SEARCH_DAYS: u32 = 400;
/// Upper bound of days scanned by the `m` rule.
pub const MONTHLY_SEARCH_DAYS: u32 = 730;

/// Computes the next occurrence of `rule` for a task dated `start`.
///
/// `reference` is the calendar day of the instant the result must follow.
/// Returns canonical `YYYYMMDD` text.
///
/// # Errors
/// - [`RuleError::MissingRule`] when `rule` is blank.
/// - [`RuleError::InvalidStart`] when `start` is not canonical date text.
/// - Parse and search failures from the rule itself.
pub fn next_date(reference: NaiveDate, start: &str, rule: &str) -> Result<String, RuleError> {
    if rule.trim().is_empty() {
        return Err(RuleError::MissingRule);
    }
    let start_day = parse_date(start).ok_or_else(|| RuleError::InvalidStart(start.to_string()))?;
    let rule = rule.parse::<RepeatRule>()?;
    rule.next_after(start_day, reference).map(format_date)
}

/// Maps a weekday to the rule numbering: Monday = 1 .. Sunday = 7.
pub fn weekday_number(weekday: Weekday) -> u32 {
    weekday.number_from_monday()
}

impl RepeatRule {
    /// Returns the first day produced by this rule from `start` that falls
    /// strictly after `reference`.
    pub fn next_after(&self, start: NaiveDate, reference: NaiveDate) -> Result<NaiveDate, RuleError> {
        let found = match self {
            Self::Daily { interval } => next_daily(start, reference, *interval),
            Self::Yearly => next_yearly(start, reference),
            Self::Weekly { weekdays } => next_weekly(start, reference, weekdays),
            Self::Monthly { days, months } => next_monthly(start, reference, days, months),
        };
        found.ok_or(RuleError::NoOccurrenceFound { rule: self.kind() })
    }
}

fn next_daily(start: NaiveDate, reference: NaiveDate, interval: u32) -> Option<NaiveDate> {
    let interval = u64::from(interval);
    let steps = if start > reference {
        1
    } else {
        let behind = u64::try_from((reference - start).num_days()).ok()?;
        behind / interval + 1
    };
    start.checked_add_days(Days::new(steps.checked_mul(interval)?))
}

fn next_yearly(start: NaiveDate, reference: NaiveDate) -> Option<NaiveDate> {
    // Earlier anniversaries fall in years before the reference year.
    let mut offset = (reference.year() - start.year()).max(1);
    loop {
        let candidate = anniversary(start, start.year().checked_add(offset)?)?;
        if candidate > reference {
            return Some(candidate);
        }
        offset += 1;
    }
}

fn anniversary(anchor: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day()).or_else(|| {
        (anchor.month() == 2 && anchor.day() == 29)
            .then(|| NaiveDate::from_ymd_opt(year, 2, 28))
            .flatten()
    })
}

fn next_weekly(
    start: NaiveDate,
    reference: NaiveDate,
    weekdays: &BTreeSet<u32>,
) -> Option<NaiveDate> {
    let mut current = start.max(reference);
    for _ in 0..WEEKLY_SEARCH_DAYS {
        current = current.succ_opt()?;
        if current > reference && weekdays.contains(&weekday_number(current.weekday())) {
            return Some(current);
        }
    }
    None
}

fn next_monthly(
    start: NaiveDate,
    reference: NaiveDate,
    days: &BTreeSet<i32>,
    months: &BTreeSet<u32>,
) -> Option<NaiveDate> {
    let mut current = start;
    for _ in 0..MONTHLY_SEARCH_DAYS {
        current = current.succ_opt()?;
        let month_ok = months.is_empty() || months.contains(&current.month());
        if month_ok && current > reference && day_matches(current, days) {
            return Some(current);
        }
    }
    None
}

fn day_matches(date: NaiveDate, days: &BTreeSet<i32>) -> bool {
    let day = date.day() as i32;
    let last = last_day_of_month(date) as i32;
    days.contains(&day)
        || (days.contains(&-1) && day == last)
        || (days.contains(&-2) && day == last - 1)
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    (28..=31)
        .rev()
        .find(|day| date.with_day(*day).is_some())
        .unwrap_or(28)
}
