//! Repeat-rule grammar and next-occurrence evaluation.
//!
//! # Responsibility
//! - Parse compact rule text (`d N`, `y`, `w ...`, `m ...`) into [`RepeatRule`].
//! - Compute the first occurrence strictly after a reference day.
//!
//! # Invariants
//! - Evaluation is pure: no clock reads, no I/O, no shared state.
//! - Weekly and monthly searches are bounded (400 and 730 days).
//! - "After" always compares calendar days, never time of day.

pub mod engine;
pub mod rule;

pub use engine::{next_date, weekday_number, MONTHLY_SEARCH_DAYS, WEEKLY_SEARCH_DAYS};
pub use rule::{RepeatRule, RuleError, DAILY_INTERVAL_MAX};
