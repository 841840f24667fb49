//! Assignment outcomes (the solution of one scheduling run).
//!
//! Every participant handed to the scheduler yields exactly one
//! [`ScheduledAssignment`], in input order. Failure to place someone is an
//! ordinary [`Outcome`], never an error.

use serde::{Deserialize, Serialize};

use super::recurrence::Frequency;
use super::time_window::TimeWindow;

/// Reason text for a participant whose every choice was taken.
pub const REASON_SLOTS_TAKEN: &str = "All preferred slots are already taken";

/// Reason text for a participant without any usable choice.
pub const REASON_NO_PREFERENCES: &str = "No usable preferred time slots";

/// What happened to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Booked into one of their choices.
    Scheduled {
        /// Rank of the accepted choice (1..=3).
        rank: u8,
        /// The booked slot.
        timing: TimeWindow,
        /// How often it repeats.
        frequency: Frequency,
    },
    /// Had usable choices, none of them free.
    Unscheduled {
        /// First usable choice, for display only.
        first_choice: TimeWindow,
        /// Human-readable reason.
        reason: String,
    },
    /// Had no usable choice at all; needs manual attention.
    NoUsablePreferences,
}

/// The result for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAssignment {
    /// Participant identifier.
    pub participant_id: String,
    /// Participant display name.
    pub participant_name: String,
    /// What happened.
    pub outcome: Outcome,
}

impl ScheduledAssignment {
    /// Creates an assignment record.
    pub fn new(
        participant_id: impl Into<String>,
        participant_name: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            participant_name: participant_name.into(),
            outcome,
        }
    }

    /// Whether a slot was booked.
    #[inline]
    pub fn accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Scheduled { .. })
    }

    /// Accepted rank, or 0 when nothing was booked.
    pub fn chosen_rank(&self) -> u8 {
        match self.outcome {
            Outcome::Scheduled { rank, .. } => rank,
            _ => 0,
        }
    }

    /// Booked slot, or the first choice for display when rejected.
    pub fn chosen_timing(&self) -> Option<&TimeWindow> {
        match &self.outcome {
            Outcome::Scheduled { timing, .. } => Some(timing),
            Outcome::Unscheduled { first_choice, .. } => Some(first_choice),
            Outcome::NoUsablePreferences => None,
        }
    }

    /// Frequency of the booked slot.
    pub fn frequency(&self) -> Option<Frequency> {
        match self.outcome {
            Outcome::Scheduled { frequency, .. } => Some(frequency),
            _ => None,
        }
    }

    /// Rejection reason, `None` when accepted.
    pub fn reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Scheduled { .. } => None,
            Outcome::Unscheduled { reason, .. } => Some(reason),
            Outcome::NoUsablePreferences => Some(REASON_NO_PREFERENCES),
        }
    }
}

/// All assignments of one run, in participant input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingReport {
    /// One record per input participant.
    pub assignments: Vec<ScheduledAssignment>,
}

impl SchedulingReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record.
    pub fn push(&mut self, assignment: ScheduledAssignment) {
        self.assignments.push(assignment);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the report holds no records.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Record for a participant.
    pub fn assignment_for(&self, participant_id: &str) -> Option<&ScheduledAssignment> {
        self.assignments
            .iter()
            .find(|a| a.participant_id == participant_id)
    }

    /// Accepted records.
    pub fn accepted(&self) -> impl Iterator<Item = &ScheduledAssignment> {
        self.assignments.iter().filter(|a| a.accepted())
    }

    /// Records whose choices were all taken.
    pub fn unscheduled(&self) -> impl Iterator<Item = &ScheduledAssignment> {
        self.assignments
            .iter()
            .filter(|a| matches!(a.outcome, Outcome::Unscheduled { .. }))
    }

    /// Records without any usable choice.
    pub fn needs_attention(&self) -> impl Iterator<Item = &ScheduledAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.outcome == Outcome::NoUsablePreferences)
    }

    /// Records as the reference behavior reports them: participants without
    /// usable choices are left out entirely.
    pub fn legacy_records(&self) -> impl Iterator<Item = &ScheduledAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.outcome != Outcome::NoUsablePreferences)
    }
}
