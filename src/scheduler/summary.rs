//! Run summary metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Scheduled | Participants placed into one of their choices |
//! | By rank | How many were placed at rank 1, 2 and 3 |
//! | Unscheduled | Participants whose every choice was taken |
//! | Needs attention | Participants without a usable choice |
//! | Acceptance rate | Scheduled / (scheduled + unscheduled) |
//! | First-choice rate | Rank-1 placements / scheduled |

use serde::{Deserialize, Serialize};

use crate::models::{Outcome, SchedulingReport, MAX_RANKS};

/// Counts and rates describing one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of records.
    pub total: usize,
    /// Accepted records.
    pub scheduled: usize,
    /// Accepted records per rank (index 0 = rank 1).
    pub by_rank: [usize; MAX_RANKS],
    /// Rejected records.
    pub unscheduled: usize,
    /// Records without usable preferences.
    pub needs_attention: usize,
    /// Fraction of participants with usable choices that were placed (0.0..=1.0).
    pub acceptance_rate: f64,
    /// Fraction of placements at rank 1 (0.0..=1.0).
    pub first_choice_rate: f64,
}

impl ReportSummary {
    /// Summarizes a report.
    pub fn calculate(report: &SchedulingReport) -> Self {
        let mut summary = Self {
            total: report.len(),
            ..Self::default()
        };

        for assignment in &report.assignments {
            match assignment.outcome {
                Outcome::Scheduled { rank, .. } => {
                    summary.scheduled += 1;
                    let index = usize::from(rank).saturating_sub(1);
                    if let Some(slot) = summary.by_rank.get_mut(index) {
                        *slot += 1;
                    }
                }
                Outcome::Unscheduled { .. } => summary.unscheduled += 1,
                Outcome::NoUsablePreferences => summary.needs_attention += 1,
            }
        }

        let considered = summary.scheduled + summary.unscheduled;
        summary.acceptance_rate = if considered == 0 {
            1.0
        } else {
            summary.scheduled as f64 / considered as f64
        };
        summary.first_choice_rate = if summary.scheduled == 0 {
            0.0
        } else {
            summary.by_rank[0] as f64 / summary.scheduled as f64
        };
        summary
    }

    /// Whether every participant with usable choices was placed.
    pub fn all_placed(&self) -> bool {
        self.unscheduled == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, ScheduledAssignment, TimeWindow, REASON_SLOTS_TAKEN};
    use chrono::Weekday;

    fn scheduled(id: &str, rank: u8) -> ScheduledAssignment {
        ScheduledAssignment::new(
            id,
            id,
            Outcome::Scheduled {
                rank,
                timing: TimeWindow::from_hm(Weekday::Mon, (9, 0), (10, 0)).unwrap(),
                frequency: Frequency::Weekly,
            },
        )
    }

    fn unscheduled(id: &str) -> ScheduledAssignment {
        ScheduledAssignment::new(
            id,
            id,
            Outcome::Unscheduled {
                first_choice: TimeWindow::from_hm(Weekday::Mon, (9, 0), (10, 0)).unwrap(),
                reason: REASON_SLOTS_TAKEN.into(),
            },
        )
    }

    #[test]
    fn test_summary_counts() {
        let report = SchedulingReport {
            assignments: vec![
                scheduled("a", 1),
                scheduled("b", 1),
                scheduled("c", 3),
                unscheduled("d"),
                ScheduledAssignment::new("e", "e", Outcome::NoUsablePreferences),
            ],
        };
        let s = ReportSummary::calculate(&report);
        assert_eq!(s.total, 5);
        assert_eq!(s.scheduled, 3);
        assert_eq!(s.by_rank, [2, 0, 1]);
        assert_eq!(s.unscheduled, 1);
        assert_eq!(s.needs_attention, 1);
        assert!((s.acceptance_rate - 0.75).abs() < 1e-10);
        assert!((s.first_choice_rate - 2.0 / 3.0).abs() < 1e-10);
        assert!(!s.all_placed());
    }

    #[test]
    fn test_summary_empty() {
        let s = ReportSummary::calculate(&SchedulingReport::new());
        assert_eq!(s.total, 0);
        assert!((s.acceptance_rate - 1.0).abs() < 1e-10);
        assert!((s.first_choice_rate - 0.0).abs() < 1e-10);
        assert!(s.all_placed());
    }
}
