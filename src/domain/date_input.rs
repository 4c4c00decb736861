//! Transaction date parsing
//!
//! Dates arrive from the finance form as `YYYY-MM-DD`, but relative forms
//! like `yesterday` or `last friday` are accepted too.

use crate::error::{CodexError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::str::FromStr;

/// A date as typed by the user, before it is pinned to a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Today,
    Yesterday,
    Tomorrow,
    /// Most recent occurrence of a weekday, today included
    Weekday(Weekday),
    /// Occurrence strictly before today
    LastWeekday(Weekday),
    /// Occurrence strictly after today
    NextWeekday(Weekday),
    Exact(NaiveDate),
}

impl DateInput {
    /// Parse a date string. Blank input means today.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        match normalized.as_str() {
            "" | "today" | "now" => return Ok(DateInput::Today),
            "yesterday" => return Ok(DateInput::Yesterday),
            "tomorrow" => return Ok(DateInput::Tomorrow),
            _ => {}
        }

        if let Some(day) = normalized.strip_prefix("last ") {
            return parse_weekday(day, input).map(DateInput::LastWeekday);
        }
        if let Some(day) = normalized.strip_prefix("next ") {
            return parse_weekday(day, input).map(DateInput::NextWeekday);
        }
        if let Ok(day) = parse_weekday(&normalized, input) {
            return Ok(DateInput::Weekday(day));
        }

        NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
            .map(DateInput::Exact)
            .map_err(|_| CodexError::InvalidDate(input.to_string()))
    }

    /// Pin this input to a calendar day relative to `today`
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match *self {
            DateInput::Today => today,
            DateInput::Yesterday => today - Duration::days(1),
            DateInput::Tomorrow => today + Duration::days(1),
            DateInput::Weekday(day) => today - Duration::days(days_back(today.weekday(), day)),
            DateInput::LastWeekday(day) => {
                let back = days_back(today.weekday(), day);
                today - Duration::days(if back == 0 { 7 } else { back })
            }
            DateInput::NextWeekday(day) => {
                let forward = days_back(day, today.weekday());
                today + Duration::days(if forward == 0 { 7 } else { forward })
            }
            DateInput::Exact(date) => date,
        }
    }
}

/// Parse and resolve in one step
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    DateInput::parse(input).map(|d| d.resolve(today))
}

/// Days to walk back from `from` to reach `to` (0..=6)
fn days_back(from: Weekday, to: Weekday) -> i64 {
    let diff = from.num_days_from_monday() as i64 - to.num_days_from_monday() as i64;
    diff.rem_euclid(7)
}

fn parse_weekday(day: &str, original: &str) -> Result<Weekday> {
    // chrono accepts "mon" as well as "monday"
    Weekday::from_str(day.trim()).map_err(|_| CodexError::InvalidDate(original.to_string()))
}
