//! Input validation for slot scheduling.
//!
//! The scheduler accepts any well-typed input and never fails; these checks
//! let a host surface problems before a run instead of discovering them as
//! odd outcomes afterwards. Detects:
//! - Duplicate participant IDs
//! - An empty horizon (zero weeks)
//! - Booked entries that end at or before their start
//! - Preferences reaching outside operating hours (they can never be placed)

use std::collections::HashSet;

use crate::models::{BookedEntry, OperatingHours, Participant, ScheduleWindow};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two participants share the same ID.
    DuplicateId,
    /// The schedule window models no weeks.
    EmptyHorizon,
    /// A booked entry does not end after it starts.
    InvalidBookedEntry,
    /// A preference lies partly or wholly outside operating hours.
    OutsideOperatingHours,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input of a scheduling run.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    participants: &[Participant],
    booked: &[BookedEntry],
    window: &ScheduleWindow,
    hours: &OperatingHours,
) -> ValidationResult {
    let mut errors = Vec::new();

    if window.weeks == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyHorizon,
            format!("Schedule starting {} covers no weeks", window.anchor),
        ));
    }

    let mut ids = HashSet::new();
    for p in participants {
        if !ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate participant ID: {}", p.id),
            ));
        }

        for choice in p.preferences.choices() {
            if !hours.contains(&choice.window) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OutsideOperatingHours,
                    format!(
                        "Participant '{}' rank {} ({}) is outside operating hours",
                        p.id, choice.rank, choice.window
                    ),
                ));
            }
        }
    }

    for entry in booked {
        if entry.end <= entry.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidBookedEntry,
                format!("Booked entry at {} ends at {}", entry.start, entry.end),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
