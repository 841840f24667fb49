//! Error types.
//!
//! Parsing host payloads is fallible; the scheduling run itself is not.
//! Every per-participant failure is reported through
//! [`Outcome`](crate::models::Outcome) instead of an error.

use thiserror::Error;

/// Failure to turn a host-supplied string into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Weekday name not recognized.
    #[error("unknown weekday: {0:?}")]
    Weekday(String),
    /// Time of day not in `HH:MM` or `HH:MM:SS` form.
    #[error("invalid time of day: {0:?}")]
    TimeOfDay(String),
    /// Frequency keyword not recognized.
    #[error("unknown frequency: {0:?}")]
    Frequency(String),
    /// Timestamp not in a supported ISO-8601 form.
    #[error("invalid datetime: {0:?}")]
    DateTime(String),
    /// Recurrence rule is malformed or uses an unsupported part.
    #[error("invalid recurrence rule {rule:?}: {reason}")]
    RecurrenceRule {
        /// The offending rule string.
        rule: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A required field was absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// End does not come after start.
    #[error("window ends at or before its start")]
    EmptyWindow,
}

/// Failure to materialize an assignment into a concrete booking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    /// The participant was not placed, so there is nothing to book.
    #[error("participant {0:?} has no accepted slot")]
    NotScheduled(String),
    /// The requested week lies beyond chrono's date range.
    #[error("week {0} is out of the representable date range")]
    WeekOutOfRange(u32),
}
