//! Due-date normalization policy.
//!
//! # Responsibility
//! - Decide the date actually stored when a task is created or updated.
//! - Decide what marking a task done does: delete or reschedule.
//!
//! # Invariants
//! - A blank date always becomes today; nothing else supplies a default.
//! - The `d 1` rule and a date equal to today keep the date as given, so
//!   such tasks fire today instead of being pushed forward.
//! - One-shot tasks dated today or earlier are moved to today.
//! - The rule is evaluated only when a past date must advance; rule
//!   failures there are never recovered and reject the write.

use crate::model::date::{format_date, parse_date};
use crate::model::task::Task;
use crate::recurrence::{next_date, RuleError};
use chrono::{NaiveDate, NaiveDateTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rule text that keeps a past date unchanged on create/update.
pub const DAILY_ONE_RULE: &str = "d 1";

/// Rejection of a task date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Date text is not canonical `YYYYMMDD`.
    InvalidDate(String),
    /// Repeat rule could not produce the next date.
    Rule(RuleError),
}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`: expected YYYYMMDD"),
            Self::Rule(err) => write!(f, "invalid date: cannot compute next date: {err}"),
        }
    }
}

impl Error for NormalizeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(_) => None,
            Self::Rule(err) => Some(err),
        }
    }
}

impl From<RuleError> for NormalizeError {
    fn from(value: RuleError) -> Self {
        Self::Rule(value)
    }
}

/// Outcome of marking a task done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionAction {
    /// One-shot task is consumed.
    Delete,
    /// Recurring task moves to the contained canonical date.
    Reschedule(String),
}

/// Returns the date to store for a task with `date` and `repeat` at `now`.
///
/// # Errors
/// - [`NormalizeError::InvalidDate`] for non-canonical date text.
/// - [`NormalizeError::Rule`] when a past date must advance and `repeat` is
///   malformed or yields no date.
pub fn normalize_date(date: &str, repeat: &str, now: NaiveDateTime) -> Result<String, NormalizeError> {
    let today = now.date();
    let date = if date.trim().is_empty() {
        format_date(today)
    } else {
        date.to_string()
    };
    let day = parse_date(&date).ok_or_else(|| NormalizeError::InvalidDate(date.clone()))?;

    let repeat = repeat.trim();
    if repeat.is_empty() {
        return Ok(if day > today { date } else { format_date(today) });
    }

    if repeat == DAILY_ONE_RULE || day >= today {
        return Ok(date);
    }
    Ok(next_date(today, &date, repeat)?)
}

/// Normalizes `task.date` in place.
pub fn normalize_task(task: &mut Task, now: NaiveDateTime) -> Result<(), NormalizeError> {
    task.date = normalize_date(&task.date, &task.repeat, now)?;
    Ok(())
}

/// Decides the effect of marking `task` done on `today`.
pub fn completion_action(task: &Task, today: NaiveDate) -> Result<CompletionAction, NormalizeError> {
    match task.repeat_rule() {
        None => Ok(CompletionAction::Delete),
        Some(rule) => Ok(CompletionAction::Reschedule(next_date(today, &task.date, rule)?)),
    }
}
