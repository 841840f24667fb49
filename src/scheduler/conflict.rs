//! Conflict checking and booking against the availability grid.
//!
//! Both functions walk the same week set (see
//! [`recurring_weeks`](crate::recurrence::recurring_weeks)), so a
//! successful check followed by [`book`] clears exactly the ticks that
//! were just found free.

use crate::config::OnceCheck;
use crate::grid::AvailabilityGrid;
use crate::models::{Frequency, TimeWindow};
use crate::recurrence::recurring_weeks;

/// Whether booking `window` at `frequency` would collide with an occupied
/// tick in any week it recurs in.
pub fn has_conflict(
    window: &TimeWindow,
    frequency: Frequency,
    grid: &AvailabilityGrid,
    once: OnceCheck,
) -> bool {
    recurring_weeks(frequency, grid.weeks(), once).any(|week| !grid.fits(week, window))
}

/// Marks `window` occupied in every week it recurs in.
///
/// Call only after [`has_conflict`] returned `false` for the same arguments.
pub fn book(
    window: &TimeWindow,
    frequency: Frequency,
    grid: &mut AvailabilityGrid,
    once: OnceCheck,
) {
    for week in recurring_weeks(frequency, grid.weeks(), once) {
        grid.occupy(week, window);
    }
}
