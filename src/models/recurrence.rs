//! Recurrence models.
//!
//! Two shapes of recurrence reach the scheduler:
//!
//! - [`Frequency`]: the closed set a participant picks from when stating a
//!   preference (`once`, `weekly`, `2weekly`, `monthly`).
//! - [`RecurrenceRule`]: the rule string stored on an already booked entry.
//!   Only the weekly subset of RFC 5545 RRULE is understood:
//!   `FREQ=WEEKLY;INTERVAL=n;BYDAY=XX;COUNT=k;UNTIL=yyyymmdd`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// How often a preferred slot repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// A single occurrence.
    Once,
    /// Every week.
    #[default]
    Weekly,
    /// Every second week.
    EveryTwoWeeks,
    /// Every fourth week ("monthly" in host payloads).
    EveryFourWeeks,
}

impl Frequency {
    /// Spacing between occurrences, in weeks.
    ///
    /// `Once` reports 1: it is checked like a weekly slot unless the
    /// scheduler is configured to look at the first week only.
    pub fn interval_weeks(self) -> u32 {
        match self {
            Self::Once | Self::Weekly => 1,
            Self::EveryTwoWeeks => 2,
            Self::EveryFourWeeks => 4,
        }
    }

    /// The host keyword for this frequency.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Weekly => "weekly",
            Self::EveryTwoWeeks => "2weekly",
            Self::EveryFourWeeks => "monthly",
        }
    }
}

impl FromStr for Frequency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" | "one-time" | "single" => Ok(Self::Once),
            "weekly" | "every-week" => Ok(Self::Weekly),
            "2weekly" | "biweekly" | "every-2-weeks" | "fortnightly" => Ok(Self::EveryTwoWeeks),
            "monthly" | "4weekly" | "every-4-weeks" => Ok(Self::EveryFourWeeks),
            _ => Err(ParseError::Frequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest `INTERVAL` accepted from a stored rule (ten years of weeks).
pub const MAX_INTERVAL_WEEKS: u32 = 520;

/// Largest `COUNT` accepted from a stored rule.
pub const MAX_COUNT: u32 = 10_000;

/// Weekly recurrence rule attached to a booked entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Weeks between occurrences (>= 1).
    pub interval_weeks: u32,
    /// Weekday the entry recurs on. `None` = the weekday of its first start.
    pub by_day: Option<Weekday>,
    /// Total number of occurrences, counted from the first start.
    pub count: Option<u32>,
    /// Last date an occurrence may fall on (inclusive).
    pub until: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// A plain weekly rule with the given interval.
    pub fn weekly(interval_weeks: u32) -> Self {
        Self {
            interval_weeks: interval_weeks.max(1),
            by_day: None,
            count: None,
            until: None,
        }
    }

    /// Sets the recurrence weekday.
    pub fn with_day(mut self, day: Weekday) -> Self {
        self.by_day = Some(day);
        self
    }

    /// Limits the number of occurrences.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the last allowed occurrence date.
    pub fn with_until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    /// Parses a stored rule string.
    ///
    /// An empty (or whitespace-only) string means "no recurrence" and
    /// yields `Ok(None)`. A leading `RRULE:` prefix is accepted.
    /// `INTERVAL` is limited to [`MAX_INTERVAL_WEEKS`] and `COUNT` to
    /// [`MAX_COUNT`].
    pub fn parse(rule: &str) -> Result<Option<Self>, ParseError> {
        let body = rule.trim();
        let body = body.strip_prefix("RRULE:").unwrap_or(body);
        if body.is_empty() {
            return Ok(None);
        }

        let invalid = |reason: &'static str| ParseError::RecurrenceRule {
            rule: rule.to_string(),
            reason,
        };

        let mut weekly = false;
        let mut parsed = Self::weekly(1);

        for part in body.split(';').filter(|p| !p.trim().is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid("expected KEY=VALUE"))?;
            let value = value.trim();
            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => {
                    if !value.eq_ignore_ascii_case("WEEKLY") {
                        return Err(invalid("only FREQ=WEEKLY is supported"));
                    }
                    weekly = true;
                }
                "INTERVAL" => {
                    let n: u32 = value.parse().map_err(|_| invalid("INTERVAL is not a number"))?;
                    if n == 0 {
                        return Err(invalid("INTERVAL must be positive"));
                    }
                    if n > MAX_INTERVAL_WEEKS {
                        return Err(invalid("INTERVAL is too large"));
                    }
                    parsed.interval_weeks = n;
                }
                "BYDAY" => {
                    if value.contains(',') {
                        return Err(invalid("BYDAY accepts a single weekday"));
                    }
                    let day = parse_rrule_day(value).ok_or_else(|| invalid("unknown BYDAY"))?;
                    parsed.by_day = Some(day);
                }
                "COUNT" => {
                    let n: u32 = value.parse().map_err(|_| invalid("COUNT is not a number"))?;
                    if n > MAX_COUNT {
                        return Err(invalid("COUNT is too large"));
                    }
                    parsed.count = Some(n);
                }
                "UNTIL" => {
                    let date_part = value.get(..8).ok_or_else(|| invalid("UNTIL is too short"))?;
                    parsed.until = Some(
                        NaiveDate::parse_from_str(date_part, "%Y%m%d")
                            .map_err(|_| invalid("UNTIL is not a date"))?,
                    );
                }
                // WKST and friends do not change weekly spacing
                "WKST" => {}
                _ => return Err(invalid("unsupported rule part")),
            }
        }

        if !weekly {
            return Err(invalid("missing FREQ"));
        }
        Ok(Some(parsed))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ=WEEKLY;INTERVAL={}", self.interval_weeks)?;
        if let Some(day) = self.by_day {
            write!(f, ";BYDAY={}", rrule_day(day))?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }
        if let Some(until) = self.until {
            write!(f, ";UNTIL={}", until.format("%Y%m%d"))?;
        }
        Ok(())
    }
}

fn parse_rrule_day(s: &str) -> Option<Weekday> {
    match s.to_ascii_uppercase().as_str() {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

fn rrule_day(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
