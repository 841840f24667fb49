//! Weekly time windows and operating hours.
//!
//! # Time Model
//! A day is divided into 96 quarter-hour ticks. Tick `k` covers the
//! minutes `[15k, 15k + 15)`. A window covers every tick it touches, so
//! `14:10-14:40` occupies the ticks starting at 14:00 and 14:15 and 14:30.
//!
//! Windows are half-open `[start, end)` on a single weekday. They carry no
//! date: the week they land in is decided by the scheduler.

use std::fmt;
use std::ops::Range;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Length of one grid tick in minutes.
pub const TICK_MINUTES: u32 = 15;

/// Number of ticks in a day.
pub const TICKS_PER_DAY: u32 = 24 * 60 / TICK_MINUTES;

/// Parses a weekday name such as `"Wednesday"`, `"wed"` or `"WED"`.
pub fn parse_weekday(s: &str) -> Result<Weekday, ParseError> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| ParseError::Weekday(s.to_string()))
}

/// Parses a wall-clock time in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, ParseError> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ParseError::TimeOfDay(s.to_string()))
}

/// Minutes since midnight (seconds are dropped).
#[inline]
pub(crate) fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Ticks touched by the minute interval `[start_min, end_min)`.
pub(crate) fn ticks_between(start_min: u32, end_min: u32) -> Range<u32> {
    let end_min = end_min.min(24 * 60);
    if end_min <= start_min {
        return 0..0;
    }
    (start_min / TICK_MINUTES)..end_min.div_ceil(TICK_MINUTES)
}

/// Bit mask with one bit per tick in `range`.
pub(crate) fn range_mask(range: Range<u32>) -> u128 {
    if range.is_empty() {
        return 0;
    }
    let len = range.end - range.start;
    ((1u128 << len) - 1) << range.start
}

/// A recurring slot on one weekday, e.g. Wednesday 14:00-15:00.
///
/// Invariant: `end > start`. [`TimeWindow::new`] enforces it; the scheduler
/// itself does not re-check windows built by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Day of the week.
    pub day: Weekday,
    /// Start time (inclusive).
    pub start: NaiveTime,
    /// End time (exclusive).
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Creates a window, rejecting empty or inverted ranges.
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Self, ParseError> {
        if end <= start {
            return Err(ParseError::EmptyWindow);
        }
        Ok(Self { day, start, end })
    }

    /// Creates a window from whole hours and minutes.
    ///
    /// Returns `None` for out-of-range components or an empty range.
    pub fn from_hm(day: Weekday, start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        let start = NaiveTime::from_hms_opt(start.0, start.1, 0)?;
        let end = NaiveTime::from_hms_opt(end.0, end.1, 0)?;
        Self::new(day, start, end).ok()
    }

    /// Parses a window from host strings (`"Wednesday"`, `"14:00"`, `"15:00"`).
    pub fn parse(day: &str, start: &str, end: &str) -> Result<Self, ParseError> {
        Self::new(
            parse_weekday(day)?,
            parse_time_of_day(start)?,
            parse_time_of_day(end)?,
        )
    }

    /// Start as minutes since midnight.
    #[inline]
    pub fn start_minute(&self) -> u32 {
        minute_of_day(self.start)
    }

    /// End as minutes since midnight.
    #[inline]
    pub fn end_minute(&self) -> u32 {
        minute_of_day(self.end)
    }

    /// Length of the window in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute().saturating_sub(self.start_minute())
    }

    /// Ticks this window occupies.
    pub fn ticks(&self) -> Range<u32> {
        ticks_between(self.start_minute(), self.end_minute())
    }

    /// Whether two windows share any wall-clock time on the same weekday.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Daily bounds within which slots may be booked.
///
/// Applies to every weekday. Ticks outside these bounds are never free, so a
/// preference reaching outside them can never be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    /// Opening time (inclusive).
    pub open: NaiveTime,
    /// Closing time (exclusive).
    pub close: NaiveTime,
}

impl OperatingHours {
    /// Creates operating hours, rejecting an empty day.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self, ParseError> {
        if close <= open {
            return Err(ParseError::EmptyWindow);
        }
        Ok(Self { open, close })
    }

    /// Parses operating hours from `HH:MM` strings.
    pub fn parse(open: &str, close: &str) -> Result<Self, ParseError> {
        Self::new(parse_time_of_day(open)?, parse_time_of_day(close)?)
    }

    /// Ticks inside the operating hours.
    pub fn ticks(&self) -> Range<u32> {
        ticks_between(minute_of_day(self.open), minute_of_day(self.close))
    }

    pub(crate) fn tick_mask(&self) -> u128 {
        range_mask(self.ticks())
    }

    /// Whether every tick `window` touches is inside the operating hours.
    ///
    /// Uses the same tick rounding as the availability grid, so a window is
    /// contained exactly when the grid can ever leave it free.
    pub fn contains(&self, window: &TimeWindow) -> bool {
        let (hours, ticks) = (self.ticks(), window.ticks());
        ticks.start >= hours.start && ticks.end <= hours.end
    }
}

impl Default for OperatingHours {
    /// 08:00 to 21:00.
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
        }
    }
}
