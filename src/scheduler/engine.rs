//! Greedy ranked-preference assignment.
//!
//! # Algorithm
//!
//! 1. Build the availability grid from the booked entries.
//! 2. For each participant, in input order, try ranks 1, 2, 3.
//! 3. The first rank without a conflict in any week it recurs in is
//!    booked into the grid immediately, before the next participant.
//! 4. A participant with usable ranks but no free one is reported as
//!    unscheduled; one without any usable rank needs attention.
//!
//! No sorting, no backtracking: the first participant in the list has first
//! claim on a contested slot.
//!
//! # Complexity
//! O(p * r * w) grid probes for p participants, r <= 3 ranks and w weeks;
//! each probe is a single bit-mask test.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::conflict::{book, has_conflict};
use crate::config::SchedulerConfig;
use crate::error::ParseError;
use crate::grid::{build_availability, AvailabilityGrid};
use crate::models::{
    BookedEntry, Outcome, Participant, ParticipantInput, RawBookedEntry, ScheduleWindow,
    ScheduledAssignment, SchedulingReport, REASON_SLOTS_TAKEN,
};

/// Input container for one scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// Participants, in priority order.
    pub participants: Vec<Participant>,
    /// Already booked entries.
    #[serde(default)]
    pub booked: Vec<BookedEntry>,
    /// Modeled weeks.
    pub window: ScheduleWindow,
}

impl AssignmentRequest {
    /// Creates a request without booked entries.
    pub fn new(participants: Vec<Participant>, window: ScheduleWindow) -> Self {
        Self {
            participants,
            booked: Vec::new(),
            window,
        }
    }

    /// Sets the booked entries.
    pub fn with_booked(mut self, booked: Vec<BookedEntry>) -> Self {
        self.booked = booked;
        self
    }

    /// Builds a request from host payloads.
    ///
    /// Malformed preferences are skipped per participant; a malformed booked
    /// entry fails the whole request, since silently dropping it could
    /// double-book its slot.
    pub fn from_raw(
        participants: Vec<ParticipantInput>,
        booked: &[RawBookedEntry],
        window: ScheduleWindow,
    ) -> Result<Self, ParseError> {
        let booked = booked
            .iter()
            .map(BookedEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            participants: participants.into_iter().map(Participant::from).collect(),
            booked,
            window,
        })
    }
}

/// Greedy slot scheduler.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use u_slots::models::{BookedEntry, Frequency, Participant, ScheduleWindow, TimeWindow};
/// use u_slots::scheduler::SlotScheduler;
///
/// let anchor = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let window = ScheduleWindow::new(anchor, 4);
/// let booked = BookedEntry::parse("2026-03-04T14:00", "2026-03-04T15:00", "").unwrap();
///
/// let wed = TimeWindow::from_hm(Weekday::Wed, (14, 0), (15, 0)).unwrap();
/// let thu = TimeWindow::from_hm(Weekday::Thu, (10, 0), (11, 0)).unwrap();
/// let alex = Participant::new("alex", "Alex")
///     .with_choice(wed, Frequency::Weekly)
///     .with_choice(thu, Frequency::Weekly);
///
/// let report = SlotScheduler::new().assign(&[alex], &[booked], &window);
/// let a = report.assignment_for("alex").unwrap();
/// assert!(a.accepted());
/// assert_eq!(a.chosen_rank(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlotScheduler {
    config: SchedulerConfig,
}

impl SlotScheduler {
    /// Creates a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler with the given configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Assigns participants to slots around the booked entries.
    ///
    /// Returns one record per participant, in input order.
    pub fn assign(
        &self,
        participants: &[Participant],
        booked: &[BookedEntry],
        window: &ScheduleWindow,
    ) -> SchedulingReport {
        let mut grid = build_availability(booked, window, &self.config);
        let report = self.assign_on(participants, &mut grid);

        info!(
            participants = report.len(),
            scheduled = report.accepted().count(),
            unscheduled = report.unscheduled().count(),
            needs_attention = report.needs_attention().count(),
            weeks = window.weeks,
            "slot assignment finished"
        );
        report
    }

    /// Runs a request.
    pub fn assign_request(&self, request: &AssignmentRequest) -> SchedulingReport {
        self.assign(&request.participants, &request.booked, &request.window)
    }

    /// Assigns participants against an existing grid, booking into it.
    ///
    /// Lets a host chain several batches over the same grid; later batches
    /// see the slots taken by earlier ones.
    pub fn assign_on(
        &self,
        participants: &[Participant],
        grid: &mut AvailabilityGrid,
    ) -> SchedulingReport {
        let mut report = SchedulingReport::new();
        for participant in participants {
            let outcome = self.place(participant, grid);
            report.push(ScheduledAssignment::new(
                &participant.id,
                &participant.name,
                outcome,
            ));
        }
        report
    }

    fn place(&self, participant: &Participant, grid: &mut AvailabilityGrid) -> Outcome {
        let once = self.config.once_check;

        let Some(first) = participant.preferences.first() else {
            debug!(participant = %participant.id, "no usable preferences");
            return Outcome::NoUsablePreferences;
        };

        for choice in participant.preferences.choices() {
            if has_conflict(&choice.window, choice.frequency, grid, once) {
                continue;
            }
            book(&choice.window, choice.frequency, grid, once);
            debug!(
                participant = %participant.id,
                rank = choice.rank,
                slot = %choice.window,
                frequency = %choice.frequency,
                "slot accepted"
            );
            return Outcome::Scheduled {
                rank: choice.rank,
                timing: choice.window,
                frequency: choice.frequency,
            };
        }

        debug!(participant = %participant.id, "all preferred slots taken");
        Outcome::Unscheduled {
            first_choice: first.window,
            reason: REASON_SLOTS_TAKEN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConflictMode, OnceCheck};
    use crate::models::{Frequency, RawPreference, RecurrenceRule, TimeWindow};
    use chrono::{NaiveDate, Weekday};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap() // Monday
    }

    fn window(weeks: u32) -> ScheduleWindow {
        ScheduleWindow::new(anchor(), weeks)
    }

    fn slot(day: Weekday, start: u32, end: u32) -> TimeWindow {
        TimeWindow::from_hm(day, (start, 0), (end, 0)).unwrap()
    }

    fn wants(id: &str, window: TimeWindow, frequency: Frequency) -> Participant {
        Participant::new(id, id.to_uppercase()).with_choice(window, frequency)
    }

    fn booked(date: &str, start: &str, end: &str) -> BookedEntry {
        let start = format!("{date}T{start}:00");
        let end = format!("{date}T{end}:00");
        BookedEntry::parse(&start, &end, "").unwrap()
    }

    fn strict() -> SlotScheduler {
        SlotScheduler::with_config(
            SchedulerConfig::default().with_conflict_mode(ConflictMode::Strict),
        )
    }

    #[test]
    fn test_end_to_end_rank_fallback() {
        let booked = vec![booked("2026-03-04", "14:00", "15:00")];
        let alex = Participant::new("alex", "Alex")
            .with_choice(slot(Weekday::Wed, 14, 15), Frequency::Weekly)
            .with_choice(slot(Weekday::Thu, 10, 11), Frequency::Weekly);

        let report = SlotScheduler::new().assign(&[alex], &booked, &window(4));
        let a = report.assignment_for("alex").unwrap();
        assert!(a.accepted());
        assert_eq!(a.chosen_rank(), 2);
        assert_eq!(a.chosen_timing(), Some(&slot(Weekday::Thu, 10, 11)));
    }

    #[test]
    fn test_order_sensitivity() {
        let p1 = wants("p1", slot(Weekday::Mon, 9, 10), Frequency::Weekly);
        let p2 = wants("p2", slot(Weekday::Mon, 9, 10), Frequency::Weekly);
        let scheduler = SlotScheduler::new();

        let report = scheduler.assign(&[p1.clone(), p2.clone()], &[], &window(4));
        assert!(report.assignment_for("p1").unwrap().accepted());
        let rejected = report.assignment_for("p2").unwrap();
        assert!(!rejected.accepted());
        assert_eq!(rejected.reason(), Some(REASON_SLOTS_TAKEN));
        assert_eq!(rejected.chosen_rank(), 0);

        let report = scheduler.assign(&[p2, p1], &[], &window(4));
        assert!(report.assignment_for("p2").unwrap().accepted());
        assert!(!report.assignment_for("p1").unwrap().accepted());
        // Records follow input order
        assert_eq!(report.assignments[0].participant_id, "p2");
    }

    #[test]
    fn test_rejected_shows_first_choice() {
        let taken = wants("a", slot(Weekday::Fri, 9, 10), Frequency::Weekly);
        let late = Participant::new("b", "B")
            .with_choice(slot(Weekday::Fri, 9, 10), Frequency::Weekly)
            .with_choice(slot(Weekday::Fri, 9, 11), Frequency::Weekly);

        let report = SlotScheduler::new().assign(&[taken, late], &[], &window(2));
        let b = report.assignment_for("b").unwrap();
        assert_eq!(b.chosen_timing(), Some(&slot(Weekday::Fri, 9, 10)));
        assert!(matches!(b.outcome, Outcome::Unscheduled { .. }));
    }

    #[test]
    fn test_every_two_weeks_ignores_odd_week_booking() {
        // Booked Wednesday of week 1 only
        let booked = vec![booked("2026-03-11", "14:00", "15:00")];
        let p = wants("p", slot(Weekday::Wed, 14, 15), Frequency::EveryTwoWeeks);

        let report = SlotScheduler::new().assign(&[p], &booked, &window(4));
        assert_eq!(report.assignment_for("p").unwrap().chosen_rank(), 1);

        let weekly = wants("p", slot(Weekday::Wed, 14, 15), Frequency::Weekly);
        let report = SlotScheduler::new().assign(&[weekly], &booked, &window(4));
        assert!(!report.assignment_for("p").unwrap().accepted());
    }

    #[test]
    fn test_alternating_biweekly_participants_collide() {
        // Both anchor at week 0; the second cannot take the off weeks
        let a = wants("a", slot(Weekday::Tue, 16, 17), Frequency::EveryTwoWeeks);
        let b = wants("b", slot(Weekday::Tue, 16, 17), Frequency::EveryTwoWeeks);
        let report = SlotScheduler::new().assign(&[a, b], &[], &window(4));
        assert!(report.assignment_for("a").unwrap().accepted());
        assert!(!report.assignment_for("b").unwrap().accepted());
    }

    #[test]
    fn test_no_usable_preferences_reported() {
        let empty = Participant::new("e", "Empty").with_raw_preferences(&[
            RawPreference::default(),
            RawPreference::new("Someday", "10:00", "11:00", "weekly"),
        ]);
        let ok = wants("o", slot(Weekday::Mon, 10, 11), Frequency::Weekly);

        let report = SlotScheduler::new().assign(&[empty, ok], &[], &window(4));
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.assignment_for("e").unwrap().outcome,
            Outcome::NoUsablePreferences
        );
        // Legacy view drops the participant entirely
        let legacy: Vec<_> = report
            .legacy_records()
            .map(|a| a.participant_id.as_str())
            .collect();
        assert_eq!(legacy, vec!["o"]);
    }

    #[test]
    fn test_once_conservative_by_default() {
        // Booked in week 3 only; a one-time Monday slot is still refused
        let booked = vec![booked("2026-03-23", "09:00", "10:00")];
        let p = wants("p", slot(Weekday::Mon, 9, 10), Frequency::Once);

        let report = SlotScheduler::new().assign(&[p.clone()], &booked, &window(4));
        assert!(!report.assignment_for("p").unwrap().accepted());

        let config = SchedulerConfig::default().with_once_check(OnceCheck::FirstWeek);
        let report = SlotScheduler::with_config(config).assign(&[p], &booked, &window(4));
        assert!(report.assignment_for("p").unwrap().accepted());
    }

    #[test]
    fn test_strict_mode_blocks_recurring_booking() {
        let recurring = booked("2026-03-02", "09:00", "10:00")
            .with_recurrence(RecurrenceRule::weekly(1));
        // The entry starts a week before the window, so legacy mode drops it
        let late_anchor = ScheduleWindow::new(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(), 4);
        let p = wants("p", slot(Weekday::Mon, 9, 10), Frequency::Weekly);

        let legacy = SlotScheduler::new().assign(&[p.clone()], &[recurring.clone()], &late_anchor);
        assert!(legacy.assignment_for("p").unwrap().accepted());

        let report = strict().assign(&[p], &[recurring], &late_anchor);
        assert!(!report.assignment_for("p").unwrap().accepted());
    }

    #[test]
    fn test_strict_mode_with_interval_past_date_range() {
        // Only the first occurrence is representable
        let sparse = booked("2026-03-04", "14:00", "15:00")
            .with_recurrence(RecurrenceRule::weekly(u32::MAX));
        let p = Participant::new("p", "P")
            .with_choice(slot(Weekday::Wed, 14, 15), Frequency::Weekly)
            .with_choice(slot(Weekday::Thu, 14, 15), Frequency::Weekly);

        let report = strict().assign(&[p], &[sparse], &window(4));
        assert_eq!(report.assignment_for("p").unwrap().chosen_rank(), 2);

        let parsed = BookedEntry::parse(
            "2026-03-04T14:00:00",
            "2026-03-04T15:00:00",
            "FREQ=WEEKLY;INTERVAL=4000000000",
        );
        assert!(matches!(parsed, Err(ParseError::RecurrenceRule { .. })));
    }

    #[test]
    fn test_outside_operating_hours_rejected() {
        let p = wants("p", slot(Weekday::Sat, 21, 22), Frequency::Weekly);
        let report = SlotScheduler::new().assign(&[p], &[], &window(1));
        assert!(!report.assignment_for("p").unwrap().accepted());
    }

    #[test]
    fn test_assign_on_chains_batches() {
        let config = SchedulerConfig::default();
        let mut grid = build_availability(&[], &window(2), &config);
        let scheduler = SlotScheduler::with_config(config);
        let first = wants("a", slot(Weekday::Mon, 9, 10), Frequency::Weekly);
        let second = wants("b", slot(Weekday::Mon, 9, 10), Frequency::Weekly);

        assert!(scheduler.assign_on(&[first], &mut grid).assignments[0].accepted());
        assert!(!scheduler.assign_on(&[second], &mut grid).assignments[0].accepted());
    }

    #[test]
    fn test_request_from_raw() {
        let participants: Vec<ParticipantInput> = serde_json::from_str(
            r#"[
                {"id": "alex", "name": "Alex", "preferences": [
                    {"day": "Wednesday", "start": "14:00", "end": "15:00", "frequency": "weekly"},
                    {"day": "Thursday", "start": "10:00", "end": "11:00", "frequency": "weekly"}
                ]}
            ]"#,
        )
        .unwrap();
        let booked = vec![RawBookedEntry {
            start_time: "2026-03-04T14:00:00".into(),
            end_time: "2026-03-04T15:00:00".into(),
            recurrence_rule: String::new(),
        }];
        let request = AssignmentRequest::from_raw(participants, &booked, window(4)).unwrap();
        let report = SlotScheduler::new().assign_request(&request);
        assert_eq!(report.assignment_for("alex").unwrap().chosen_rank(), 2);
    }

    #[test]
    fn test_request_rejects_bad_booking() {
        let booked = vec![RawBookedEntry {
            start_time: "yesterday".into(),
            end_time: "2026-03-04T15:00:00".into(),
            recurrence_rule: String::new(),
        }];
        let err = AssignmentRequest::from_raw(Vec::new(), &booked, window(4)).unwrap_err();
        assert!(matches!(err, ParseError::DateTime(_)));
    }

    #[test]
    fn test_request_builder() {
        let p = wants("p", slot(Weekday::Mon, 9, 10), Frequency::Weekly);
        let request = AssignmentRequest::new(vec![p], window(2))
            .with_booked(vec![booked("2026-03-09", "09:00", "10:00")]);
        let report = SlotScheduler::new().assign_request(&request);
        assert!(!report.assignment_for("p").unwrap().accepted());
    }

    #[test]
    fn test_deterministic() {
        let participants: Vec<_> = (0..20)
            .map(|i| {
                Participant::new(format!("p{i}"), format!("P{i}"))
                    .with_choice(slot(Weekday::Mon, 9 + i % 3, 10 + i % 3), Frequency::Weekly)
                    .with_choice(
                        slot(Weekday::Tue, 9 + i % 5, 10 + i % 5),
                        Frequency::EveryTwoWeeks,
                    )
                    .with_choice(slot(Weekday::Wed, 9 + i % 7, 10 + i % 7), Frequency::Once)
            })
            .collect();
        let booked = vec![booked("2026-03-03", "12:00", "13:00")];
        let scheduler = SlotScheduler::new();
        let a = scheduler.assign(&participants, &booked, &window(8));
        let b = scheduler.assign(&participants, &booked, &window(8));
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_double_booking_randomized() {
        const DAYS: [Weekday; 7] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        const FREQS: [Frequency; 4] = [
            Frequency::Once,
            Frequency::Weekly,
            Frequency::EveryTwoWeeks,
            Frequency::EveryFourWeeks,
        ];
        let weeks = 8;
        let mut rng = StdRng::seed_from_u64(0x5107);

        for _ in 0..25 {
            let participants: Vec<Participant> = (0..40)
                .map(|i| {
                    let mut p = Participant::new(format!("p{i}"), format!("P{i}"));
                    for _ in 0..rng.random_range(0..=3) {
                        let day = DAYS[rng.random_range(0..DAYS.len())];
                        let start = rng.random_range(28..88u32) * 15;
                        let len = rng.random_range(1..=8u32) * 15;
                        let end = (start + len).min(23 * 60 + 45);
                        let w = TimeWindow::from_hm(
                            day,
                            (start / 60, start % 60),
                            (end / 60, end % 60),
                        );
                        if let Some(w) = w {
                            p = p.with_choice(w, FREQS[rng.random_range(0..FREQS.len())]);
                        }
                    }
                    p
                })
                .collect();

            let report = SlotScheduler::new().assign(&participants, &[], &window(weeks));
            assert_eq!(report.len(), participants.len());

            let accepted: Vec<_> = report.accepted().collect();
            for (i, a) in accepted.iter().enumerate() {
                for b in &accepted[i + 1..] {
                    let (wa, wb) = (a.chosen_timing().unwrap(), b.chosen_timing().unwrap());
                    let weeks_a: Vec<u32> = (0..weeks)
                        .step_by(a.frequency().unwrap().interval_weeks() as usize)
                        .collect();
                    let shares_week = (0..weeks)
                        .step_by(b.frequency().unwrap().interval_weeks() as usize)
                        .any(|w| weeks_a.contains(&w));
                    assert!(
                        !(shares_week && wa.overlaps(wb)),
                        "{} and {} double-booked {wa} / {wb}",
                        a.participant_id,
                        b.participant_id
                    );
                }
            }
        }
    }
}
