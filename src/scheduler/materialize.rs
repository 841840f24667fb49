//! Turning accepted assignments into concrete bookings.
//!
//! A materialized entry is a single occurrence: it carries an empty
//! recurrence rule. Hosts that persist a recurring slot call
//! [`materialize`] once per week, or use [`materialize_series`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::OnceCheck;
use crate::error::MaterializeError;
use crate::models::{ScheduleWindow, ScheduledAssignment, TimeWindow};
use crate::recurrence::recurring_weeks;

/// A concrete booking ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedEntry {
    /// Participant the booking belongs to.
    pub participant_id: String,
    /// Week index inside the schedule window.
    pub week: u32,
    /// Local start time.
    pub start_time: NaiveDateTime,
    /// Local end time.
    pub end_time: NaiveDateTime,
    /// Always empty: every materialized entry is a single occurrence.
    pub recurrence_rule: String,
}

/// Concrete start/end of `timing` in week `week` of `window`.
pub fn occurrence_in_week(
    timing: &TimeWindow,
    window: &ScheduleWindow,
    week: u32,
) -> Result<(NaiveDateTime, NaiveDateTime), MaterializeError> {
    let date = window
        .date_for(week, timing.day)
        .ok_or(MaterializeError::WeekOutOfRange(week))?;
    Ok((date.and_time(timing.start), date.and_time(timing.end)))
}

/// Materializes an accepted assignment for one week.
///
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use u_slots::models::{Frequency, Outcome, ScheduleWindow, ScheduledAssignment, TimeWindow};
/// use u_slots::scheduler::materialize;
///
/// let assignment = ScheduledAssignment::new("alex", "Alex", Outcome::Scheduled {
///     rank: 1,
///     timing: TimeWindow::from_hm(Weekday::Wed, (14, 0), (15, 0)).unwrap(),
///     frequency: Frequency::Weekly,
/// });
/// let window = ScheduleWindow::new(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 4);
/// let entry = materialize(&assignment, &window, 0).unwrap();
/// assert_eq!(entry.start_time.to_string(), "2026-03-04 14:00:00");
/// assert!(entry.recurrence_rule.is_empty());
/// ```
pub fn materialize(
    assignment: &ScheduledAssignment,
    window: &ScheduleWindow,
    week: u32,
) -> Result<MaterializedEntry, MaterializeError> {
    let timing = accepted_timing(assignment)?;
    let (start_time, end_time) = occurrence_in_week(timing, window, week)?;
    Ok(MaterializedEntry {
        participant_id: assignment.participant_id.clone(),
        week,
        start_time,
        end_time,
        recurrence_rule: String::new(),
    })
}

/// Materializes every week an accepted assignment recurs in.
pub fn materialize_series(
    assignment: &ScheduledAssignment,
    window: &ScheduleWindow,
    once: OnceCheck,
) -> Result<Vec<MaterializedEntry>, MaterializeError> {
    accepted_timing(assignment)?;
    let frequency = assignment.frequency().unwrap_or_default();
    recurring_weeks(frequency, window.weeks, once)
        .map(|week| materialize(assignment, window, week))
        .collect()
}

fn accepted_timing(assignment: &ScheduledAssignment) -> Result<&TimeWindow, MaterializeError> {
    if !assignment.accepted() {
        return Err(MaterializeError::NotScheduled(assignment.participant_id.clone()));
    }
    assignment
        .chosen_timing()
        .ok_or_else(|| MaterializeError::NotScheduled(assignment.participant_id.clone()))
}
