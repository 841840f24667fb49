//! Recurrence expansion.
//!
//! Two expansions live here:
//!
//! - [`recurring_weeks`]: the week indices a preference occupies if booked.
//!   Preferences are anchored at week 0, so an every-2-weeks slot lands in
//!   weeks 0, 2, 4, ...
//! - [`Occurrences`]: the concrete start/end pairs of a booked entry's
//!   recurrence within the horizon. Used for calendar rendering and by the
//!   strict conflict mode.
//!
//! Both are pure and restartable.

use std::iter::StepBy;
use std::ops::Range;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::config::OnceCheck;
use crate::models::{BookedEntry, Frequency, ScheduleWindow};

/// Week indices in `[0, weeks)` a preference of `frequency` recurs in.
///
/// ```
/// use u_slots::config::OnceCheck;
/// use u_slots::models::Frequency;
/// use u_slots::recurrence::recurring_weeks;
///
/// let weeks: Vec<u32> =
///     recurring_weeks(Frequency::EveryTwoWeeks, 7, OnceCheck::Horizon).collect();
/// assert_eq!(weeks, vec![0, 2, 4, 6]);
/// ```
pub fn recurring_weeks(frequency: Frequency, weeks: u32, once: OnceCheck) -> StepBy<Range<u32>> {
    let end = match (frequency, once) {
        (Frequency::Once, OnceCheck::FirstWeek) => weeks.min(1),
        _ => weeks,
    };
    (0..end).step_by(frequency.interval_weeks() as usize)
}

/// One concrete occurrence of a booked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Occurrence start.
    pub start: NaiveDateTime,
    /// Occurrence end.
    pub end: NaiveDateTime,
}

/// Lazy sequence of a booked entry's occurrences inside a schedule window.
///
/// Occurrences before the window's anchor are skipped but still count
/// towards a rule's `COUNT`. Iteration stops at the window end, at `UNTIL`,
/// or once `COUNT` occurrences have been produced from the first start.
/// A non-recurring entry yields itself when it falls inside the window.
#[derive(Debug, Clone)]
pub struct Occurrences {
    next_start: NaiveDateTime,
    duration: TimeDelta,
    step_days: u64,
    remaining: Option<u32>,
    until: Option<NaiveDate>,
    window_start: NaiveDate,
    window_end: NaiveDate,
    single: bool,
    done: bool,
}

/// Expands `entry` into its occurrences within `window`.
///
/// Dates that step past chrono's range end the sequence instead of
/// overflowing.
pub fn expand_occurrences(entry: &BookedEntry, window: &ScheduleWindow) -> Occurrences {
    let duration = entry.duration();
    let (first_start, step_days, remaining, until, single) = match &entry.recurrence {
        Some(rule) => {
            let shift = rule.by_day.map_or(0, |day| {
                let from = entry.start.weekday().num_days_from_monday();
                (day.num_days_from_monday() + 7 - from) % 7
            });
            (
                entry.start.checked_add_days(Days::new(u64::from(shift))),
                u64::from(rule.interval_weeks.max(1)) * 7,
                rule.count,
                rule.until,
                false,
            )
        }
        None => (Some(entry.start), 0, Some(1), None, true),
    };

    Occurrences {
        next_start: first_start.unwrap_or(entry.start),
        duration,
        step_days,
        remaining,
        until,
        window_start: window.anchor,
        window_end: window.end_date().unwrap_or(NaiveDate::MAX),
        single,
        done: first_start.is_none(),
    }
}

impl Iterator for Occurrences {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        while !self.done {
            let start = self.next_start;
            let date = start.date();

            if date >= self.window_end || self.until.is_some_and(|u| date > u) {
                self.done = true;
                return None;
            }
            if let Some(remaining) = self.remaining.as_mut() {
                if *remaining == 0 {
                    self.done = true;
                    return None;
                }
                *remaining -= 1;
            }

            match start.checked_add_days(Days::new(self.step_days)) {
                Some(next) if !self.single => self.next_start = next,
                _ => self.done = true,
            }

            if date >= self.window_start {
                let Some(end) = start.checked_add_signed(self.duration) else {
                    self.done = true;
                    return None;
                };
                return Some(Occurrence { start, end });
            }
        }
        None
    }
}
