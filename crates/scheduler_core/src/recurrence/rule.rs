//! Repeat-rule parsing.
//!
//! Grammar (tokens separated by whitespace, lists by commas):
//!
//! | Rule | Arguments |
//! |------|-----------|
//! | `d N` | interval in days, `1..=400` |
//! | `y` | none |
//! | `w D[,D...]` | weekdays, `1` = Monday .. `7` = Sunday |
//! | `m D[,D...] [M[,M...]]` | days `1..=31`, `-1` (last), `-2` (second to last); months `1..=12` |

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Largest accepted `d` interval.
pub const DAILY_INTERVAL_MAX: u32 = 400;

/// Parsed repeat rule.
///
/// `Monthly::months` is empty when the rule lists no months, meaning every
/// month qualifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatRule {
    Daily { interval: u32 },
    Yearly,
    Weekly { weekdays: BTreeSet<u32> },
    Monthly { days: BTreeSet<i32>, months: BTreeSet<u32> },
}

/// Failure to parse or evaluate a repeat rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Rule text is blank.
    MissingRule,
    /// Leading token is not one of `d`, `y`, `w`, `m`.
    UnsupportedRule(String),
    /// Malformed or out-of-range argument for a known rule kind.
    InvalidArgument { rule: &'static str, message: String },
    /// Start date is not canonical `YYYYMMDD` text.
    InvalidStart(String),
    /// Bounded search ended without a matching day.
    NoOccurrenceFound { rule: &'static str },
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRule => write!(f, "repeat rule is not specified"),
            Self::UnsupportedRule(rule) => write!(f, "unsupported repeat rule `{rule}`"),
            Self::InvalidArgument { rule, message } => {
                write!(f, "invalid `{rule}` rule: {message}")
            }
            Self::InvalidStart(value) => {
                write!(f, "invalid start date `{value}`: expected YYYYMMDD")
            }
            Self::NoOccurrenceFound { rule } => {
                write!(f, "no matching date found for `{rule}` rule")
            }
        }
    }
}

impl Error for RuleError {}

impl FromStr for RepeatRule {
    type Err = RuleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tokens = text.split_whitespace();
        let Some(kind) = tokens.next() else {
            return Err(RuleError::MissingRule);
        };
        let args = tokens.collect::<Vec<_>>();

        match kind {
            "d" => parse_daily(&args),
            "y" => parse_yearly(&args),
            "w" => parse_weekly(&args),
            "m" => parse_monthly(&args),
            _ => Err(RuleError::UnsupportedRule(text.trim().to_string())),
        }
    }
}

impl RepeatRule {
    /// Short name of the rule kind, as written in rule text.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Daily { .. } => "d",
            Self::Yearly => "y",
            Self::Weekly { .. } => "w",
            Self::Monthly { .. } => "m",
        }
    }
}

fn parse_daily(args: &[&str]) -> Result<RepeatRule, RuleError> {
    let [interval] = args else {
        return Err(invalid("d", "expected exactly one interval in days"));
    };
    let interval = interval
        .parse::<u32>()
        .ok()
        .filter(|days| (1..=DAILY_INTERVAL_MAX).contains(days))
        .ok_or_else(|| {
            invalid(
                "d",
                format!("interval must be between 1 and {DAILY_INTERVAL_MAX}, got `{interval}`"),
            )
        })?;
    Ok(RepeatRule::Daily { interval })
}

fn parse_yearly(args: &[&str]) -> Result<RepeatRule, RuleError> {
    if !args.is_empty() {
        return Err(invalid("y", "takes no arguments"));
    }
    Ok(RepeatRule::Yearly)
}

fn parse_weekly(args: &[&str]) -> Result<RepeatRule, RuleError> {
    let [list] = args else {
        return Err(invalid("w", "expected one comma-separated list of weekdays"));
    };
    let weekdays = parse_list(list, |value: &u32| (1..=7).contains(value)).map_err(|token| {
        invalid("w", format!("weekday must be between 1 and 7, got `{token}`"))
    })?;
    Ok(RepeatRule::Weekly { weekdays })
}

fn parse_monthly(args: &[&str]) -> Result<RepeatRule, RuleError> {
    let (day_list, month_list) = match args {
        [days] => (*days, None),
        [days, months] => (*days, Some(*months)),
        [] => return Err(invalid("m", "expected a comma-separated list of days")),
        _ => return Err(invalid("m", "expected at most a day list and a month list")),
    };

    let days = parse_list(day_list, |value: &i32| {
        (1..=31).contains(value) || *value == -1 || *value == -2
    })
    .map_err(|token| {
        invalid(
            "m",
            format!("day must be between 1 and 31, -1 or -2, got `{token}`"),
        )
    })?;

    let months = match month_list {
        Some(list) => parse_list(list, |value: &u32| (1..=12).contains(value)).map_err(|token| {
            invalid("m", format!("month must be between 1 and 12, got `{token}`"))
        })?,
        None => BTreeSet::new(),
    };

    Ok(RepeatRule::Monthly { days, months })
}

/// Parses a comma-separated list, returning the first offending token.
fn parse_list<T, F>(list: &str, accept: F) -> Result<BTreeSet<T>, String>
where
    T: FromStr + Ord,
    F: Fn(&T) -> bool,
{
    list.split(',')
        .map(|token| {
            token
                .parse::<T>()
                .ok()
                .filter(|value| accept(value))
                .ok_or_else(|| token.to_string())
        })
        .collect()
}

fn invalid(rule: &'static str, message: impl Into<String>) -> RuleError {
    RuleError::InvalidArgument {
        rule,
        message: message.into(),
    }
}
