//! Slot scheduling domain models.
//!
//! Plain data exchanged with the host application: what participants
//! want, what is already booked, which weeks are modeled, and what the
//! scheduler decided.
//!
//! # Domain Mappings
//!
//! | u-slots | Tutoring | Music school | Clinic |
//! |---------|----------|--------------|--------|
//! | Participant | Student | Pupil | Patient |
//! | TimeWindow | Lesson slot | Lesson slot | Therapy slot |
//! | BookedEntry | Existing lesson | Existing lesson | Existing appointment |
//! | ScheduleWindow | Term | Semester | Treatment plan |

mod assignment;
mod booking;
mod participant;
mod recurrence;
mod time_window;

pub use assignment::{
    Outcome, ScheduledAssignment, SchedulingReport, REASON_NO_PREFERENCES, REASON_SLOTS_TAKEN,
};
pub use booking::{parse_date, parse_datetime, BookedEntry, RawBookedEntry, ScheduleWindow};
pub use participant::{
    Participant, ParticipantInput, PreferenceSet, RankedPreference, RawPreference, MAX_RANKS,
};
pub use recurrence::{Frequency, RecurrenceRule, MAX_COUNT, MAX_INTERVAL_WEEKS};
pub use time_window::{
    parse_time_of_day, parse_weekday, OperatingHours, TimeWindow, TICKS_PER_DAY, TICK_MINUTES,
};

pub(crate) use booking::ticks_for;
pub(crate) use time_window::range_mask;
