//! Scheduler configuration.
//!
//! Defaults reproduce the reference behavior: 08:00-21:00 operating hours,
//! booked entries blocking only their literal week, and one-time
//! preferences checked across the whole horizon.

use serde::{Deserialize, Serialize};

use crate::models::OperatingHours;

/// How booked entries with a recurrence rule occupy the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictMode {
    /// Only the week of the entry's own start is blocked; its rule is ignored.
    #[default]
    Legacy,
    /// Every occurrence of the entry inside the horizon is blocked.
    Strict,
}

/// Which weeks a `once` preference is checked and booked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnceCheck {
    /// Every week of the horizon, like a weekly preference.
    #[default]
    Horizon,
    /// Week 0 only.
    FirstWeek,
}

/// Tunables for one scheduling run.
///
/// # Example
///
/// ```
/// use u_slots::config::{ConflictMode, SchedulerConfig};
/// use u_slots::models::OperatingHours;
///
/// let config = SchedulerConfig::default()
///     .with_operating_hours(OperatingHours::parse("07:00", "22:00").unwrap())
///     .with_conflict_mode(ConflictMode::Strict);
/// assert_eq!(config.conflict_mode, ConflictMode::Strict);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Bookable hours per day.
    pub operating_hours: OperatingHours,
    /// Treatment of recurring booked entries.
    pub conflict_mode: ConflictMode,
    /// Treatment of one-time preferences.
    pub once_check: OnceCheck,
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets operating hours.
    pub fn with_operating_hours(mut self, hours: OperatingHours) -> Self {
        self.operating_hours = hours;
        self
    }

    /// Sets the booked-entry conflict mode.
    pub fn with_conflict_mode(mut self, mode: ConflictMode) -> Self {
        self.conflict_mode = mode;
        self
    }

    /// Sets the `once` handling.
    pub fn with_once_check(mut self, once_check: OnceCheck) -> Self {
        self.once_check = once_check;
        self
    }
}
