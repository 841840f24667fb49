//! Recurring weekly slot scheduling for the U-Engine ecosystem.
//!
//! Assigns participants to weekly time slots from up to three ranked
//! preferences, without colliding with already booked entries or with each
//! other across a multi-week horizon. Pure and deterministic: no I/O, no
//! shared state between runs.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeWindow`, `Frequency`, `RecurrenceRule`,
//!   `Participant`, `PreferenceSet`, `BookedEntry`, `ScheduleWindow`,
//!   `ScheduledAssignment`, `SchedulingReport`
//! - **`grid`**: Quarter-hour availability grid and its builder
//! - **`recurrence`**: Week-index and occurrence expansion
//! - **`scheduler`**: Greedy assignment engine, conflict checks,
//!   materialization, run summary
//! - **`validation`**: Optional pre-flight input checks
//! - **`config`**: Operating hours and conflict-mode switches
//!
//! # Data Flow
//!
//! ```text
//! booked entries ─┐
//! schedule window ┼─> build_availability ─> SlotScheduler ─> SchedulingReport ─> materialize
//! participants ───┘
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod models;
pub mod recurrence;
pub mod scheduler;
pub mod validation;

pub use config::{ConflictMode, OnceCheck, SchedulerConfig};
pub use error::{MaterializeError, ParseError};
pub use scheduler::SlotScheduler;
