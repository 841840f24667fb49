//! Booked entries and the schedule window.
//!
//! A [`BookedEntry`] is an already committed slot supplied by the host's
//! persistence layer. A [`ScheduleWindow`] fixes which dates the run
//! models: `weeks` consecutive seven-day blocks starting at `anchor`.
//!
//! # Week Index
//! A date `d` falls in week `floor((d - anchor).days / 7)`. The anchor need
//! not be a Monday; week 0 is simply the seven days starting at it.

use std::ops::Range;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use super::recurrence::RecurrenceRule;
use super::time_window::{minute_of_day, ticks_between};
use crate::error::ParseError;

/// Parses an ISO-8601 timestamp into local wall time.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]` with an optional offset; an
/// offset is dropped and the wall time kept as written.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ParseError::DateTime(s.to_string()))
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ParseError::DateTime(s.to_string()))
}

/// An occupied slot that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedEntry {
    /// Start of the first (or only) occurrence.
    pub start: NaiveDateTime,
    /// End of the first (or only) occurrence.
    pub end: NaiveDateTime,
    /// Weekly repetition, if any.
    pub recurrence: Option<RecurrenceRule>,
}

impl BookedEntry {
    /// Creates a single-occurrence entry.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            recurrence: None,
        }
    }

    /// Attaches a recurrence rule.
    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Parses host strings: two ISO-8601 timestamps and a rule (may be empty).
    pub fn parse(start: &str, end: &str, recurrence_rule: &str) -> Result<Self, ParseError> {
        Ok(Self {
            start: parse_datetime(start)?,
            end: parse_datetime(end)?,
            recurrence: RecurrenceRule::parse(recurrence_rule)?,
        })
    }

    /// Weekday of the first occurrence.
    pub fn day(&self) -> Weekday {
        self.start.weekday()
    }

    /// Duration of one occurrence.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Ticks occupied on the start day.
    ///
    /// An entry running past midnight is clipped at the end of its start day.
    pub fn ticks(&self) -> Range<u32> {
        ticks_for(self.start, self.end)
    }
}

/// Ticks of `[start, end)` on the day `start` falls on.
pub(crate) fn ticks_for(start: NaiveDateTime, end: NaiveDateTime) -> Range<u32> {
    let start_min = minute_of_day(start.time());
    let end_min = if end.date() > start.date() {
        24 * 60
    } else {
        minute_of_day(end.time())
    };
    ticks_between(start_min, end_min)
}

/// Booked entry payload as sent by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBookedEntry {
    /// ISO-8601 start timestamp.
    pub start_time: String,
    /// ISO-8601 end timestamp.
    pub end_time: String,
    /// Stored recurrence rule, possibly empty.
    #[serde(default)]
    pub recurrence_rule: String,
}

impl TryFrom<&RawBookedEntry> for BookedEntry {
    type Error = ParseError;

    fn try_from(raw: &RawBookedEntry) -> Result<Self, Self::Error> {
        BookedEntry::parse(&raw.start_time, &raw.end_time, &raw.recurrence_rule)
    }
}

/// The span of weeks one scheduling run models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    /// First day of week 0.
    pub anchor: NaiveDate,
    /// Number of modeled weeks.
    pub weeks: u32,
}

impl ScheduleWindow {
    /// Creates a window of `weeks` weeks starting at `anchor`.
    pub fn new(anchor: NaiveDate, weeks: u32) -> Self {
        Self { anchor, weeks }
    }

    /// Parses an ISO anchor date.
    pub fn parse(anchor: &str, weeks: u32) -> Result<Self, ParseError> {
        Ok(Self::new(parse_date(anchor)?, weeks))
    }

    /// Covers `[start, end)` with whole weeks (at least one).
    pub fn spanning(start: NaiveDate, end: NaiveDate) -> Self {
        let days = (end - start).num_days().max(0);
        let weeks = u32::try_from((days + 6) / 7).unwrap_or(u32::MAX).max(1);
        Self::new(start, weeks)
    }

    /// First day after the last modeled week, or `None` past chrono's
    /// date range.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.anchor.checked_add_days(Days::new(u64::from(self.weeks) * 7))
    }

    /// Week index of `date`, or `None` outside the window.
    pub fn week_of(&self, date: NaiveDate) -> Option<u32> {
        let days = (date - self.anchor).num_days();
        if days < 0 {
            return None;
        }
        u32::try_from(days / 7).ok().filter(|&w| w < self.weeks)
    }

    /// The date of `day` within week `week`.
    ///
    /// Walks forward from the anchor to the first `day`, then adds whole
    /// weeks. Does not check `week` against the window; returns `None` only
    /// when the date falls outside chrono's range.
    pub fn date_for(&self, week: u32, day: Weekday) -> Option<NaiveDate> {
        let from = self.anchor.weekday().num_days_from_monday();
        let to = day.num_days_from_monday();
        let offset = (to + 7 - from) % 7;
        self.anchor.checked_add_days(Days::new(u64::from(offset) + u64::from(week) * 7))
    }

    /// Whether `date` lies inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.week_of(date).is_some()
    }
}
