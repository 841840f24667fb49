//! Availability grid.
//!
//! Free quarter-hour ticks per `(week, weekday)` cell, stored as one `u128`
//! bit set per cell (bit `k` = tick `k`, 96 ticks per day). A fresh grid
//! has every tick inside operating hours set; booking clears bits.
//!
//! The grid is scratch state owned by a single scheduling run. Clearing
//! bits is the only thing that stops two participants from landing in the
//! same slot, so every accepted booking must be written back before the
//! next participant is considered.

use std::ops::Range;

use chrono::{Datelike, Weekday};
use tracing::trace;

use crate::config::{ConflictMode, SchedulerConfig};
use crate::models::{
    range_mask, ticks_for, BookedEntry, OperatingHours, ScheduleWindow, TimeWindow, TICKS_PER_DAY,
    TICK_MINUTES,
};
use crate::recurrence::expand_occurrences;

const DAYS_PER_WEEK: usize = 7;

/// Free ticks for every `(week, weekday)` of a horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityGrid {
    weeks: u32,
    hours: OperatingHours,
    cells: Vec<u128>,
}

impl AvailabilityGrid {
    /// Creates a grid with every in-hours tick free.
    pub fn new(weeks: u32, hours: OperatingHours) -> Self {
        Self {
            weeks,
            hours,
            cells: vec![hours.tick_mask(); weeks as usize * DAYS_PER_WEEK],
        }
    }

    /// Number of modeled weeks.
    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Operating hours the grid was built with.
    pub fn operating_hours(&self) -> OperatingHours {
        self.hours
    }

    #[inline]
    fn index(&self, week: u32, day: Weekday) -> Option<usize> {
        (week < self.weeks)
            .then(|| week as usize * DAYS_PER_WEEK + day.num_days_from_monday() as usize)
    }

    /// Whether every tick in `ticks` is free. Weeks outside the grid are never free.
    pub fn is_free(&self, week: u32, day: Weekday, ticks: Range<u32>) -> bool {
        let mask = range_mask(ticks);
        self.index(week, day)
            .is_some_and(|i| self.cells[i] & mask == mask)
    }

    /// Whether `window` fits in week `week`.
    pub fn fits(&self, week: u32, window: &TimeWindow) -> bool {
        self.is_free(week, window.day, window.ticks())
    }

    /// Removes `ticks` from a cell. Weeks outside the grid are ignored.
    pub fn occupy_ticks(&mut self, week: u32, day: Weekday, ticks: Range<u32>) {
        if let Some(i) = self.index(week, day) {
            self.cells[i] &= !range_mask(ticks);
        }
    }

    /// Removes `window`'s ticks from week `week`.
    pub fn occupy(&mut self, week: u32, window: &TimeWindow) {
        self.occupy_ticks(week, window.day, window.ticks());
    }

    /// Number of free ticks in a cell.
    pub fn free_tick_count(&self, week: u32, day: Weekday) -> u32 {
        self.index(week, day).map_or(0, |i| self.cells[i].count_ones())
    }

    /// Free ticks in a cell, ascending.
    pub fn free_ticks(&self, week: u32, day: Weekday) -> impl Iterator<Item = u32> + '_ {
        let bits = self.index(week, day).map_or(0, |i| self.cells[i]);
        (0..TICKS_PER_DAY).filter(move |t| bits & (1u128 << t) != 0)
    }

    /// Contiguous free spans of a cell, in minutes since midnight.
    ///
    /// ```
    /// use chrono::Weekday;
    /// use u_slots::grid::AvailabilityGrid;
    /// use u_slots::models::{OperatingHours, TimeWindow};
    ///
    /// let mut grid = AvailabilityGrid::new(1, OperatingHours::default());
    /// grid.occupy(0, &TimeWindow::from_hm(Weekday::Mon, (12, 0), (13, 0)).unwrap());
    /// assert_eq!(grid.free_ranges(0, Weekday::Mon), vec![480..720, 780..1260]);
    /// ```
    pub fn free_ranges(&self, week: u32, day: Weekday) -> Vec<Range<u32>> {
        let mut spans: Vec<Range<u32>> = Vec::new();
        for tick in self.free_ticks(week, day) {
            let start = tick * TICK_MINUTES;
            match spans.last_mut() {
                Some(last) if last.end == start => last.end = start + TICK_MINUTES,
                _ => spans.push(start..start + TICK_MINUTES),
            }
        }
        spans
    }
}

/// Builds the grid for a run from the already booked entries.
///
/// # Algorithm
/// 1. Start with every in-hours tick of every `(week, day)` free.
/// 2. For each entry, find the week its start date falls in (floor of the
///    day offset from the anchor over 7) and clear its ticks on its weekday.
///    Entries outside `[0, weeks)` are ignored.
///
/// In [`ConflictMode::Legacy`] an entry's recurrence rule is not looked at:
/// it blocks only the week it literally starts in. [`ConflictMode::Strict`]
/// blocks every occurrence of the rule inside the horizon instead.
pub fn build_availability(
    entries: &[BookedEntry],
    window: &ScheduleWindow,
    config: &SchedulerConfig,
) -> AvailabilityGrid {
    let mut grid = AvailabilityGrid::new(window.weeks, config.operating_hours);

    for entry in entries {
        match config.conflict_mode {
            ConflictMode::Legacy => match window.week_of(entry.start.date()) {
                Some(week) => grid.occupy_ticks(week, entry.day(), entry.ticks()),
                None => trace!(start = %entry.start, "booked entry outside horizon"),
            },
            ConflictMode::Strict => {
                for occ in expand_occurrences(entry, window) {
                    if let Some(week) = window.week_of(occ.start.date()) {
                        grid.occupy_ticks(week, occ.start.weekday(), ticks_for(occ.start, occ.end));
                    }
                }
            }
        }
    }

    grid
}
