//! Participants and their ranked time preferences.
//!
//! Hosts submit up to three ranked choices per participant as loose
//! strings ([`RawPreference`]). Parsing turns each into an optional
//! [`RankedPreference`]; ranks that cannot be parsed are simply absent,
//! the rank numbers of the remaining ones are kept.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::recurrence::Frequency;
use super::time_window::TimeWindow;
use crate::error::ParseError;

/// Highest rank a participant may state.
pub const MAX_RANKS: usize = 3;

/// One preference exactly as the host submitted it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPreference {
    /// Weekday name.
    #[serde(default)]
    pub day: Option<String>,
    /// Start time, `HH:MM`.
    #[serde(default)]
    pub start: Option<String>,
    /// End time, `HH:MM`.
    #[serde(default)]
    pub end: Option<String>,
    /// Frequency keyword. Absent means weekly.
    #[serde(default)]
    pub frequency: Option<String>,
}

impl RawPreference {
    /// Creates a fully populated raw preference.
    pub fn new(
        day: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            day: Some(day.into()),
            start: Some(start.into()),
            end: Some(end.into()),
            frequency: Some(frequency.into()),
        }
    }

    /// Parses into a typed window and frequency.
    pub fn parse(&self) -> Result<(TimeWindow, Frequency), ParseError> {
        let day = non_blank(&self.day).ok_or(ParseError::MissingField("day"))?;
        let start = non_blank(&self.start).ok_or(ParseError::MissingField("start"))?;
        let end = non_blank(&self.end).ok_or(ParseError::MissingField("end"))?;
        let window = TimeWindow::parse(day, start, end)?;
        let frequency = match non_blank(&self.frequency) {
            Some(f) => f.parse()?,
            None => Frequency::default(),
        };
        Ok((window, frequency))
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A parsed preference with its rank (1 = most preferred).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPreference {
    /// Rank, 1..=3.
    pub rank: u8,
    /// Preferred slot.
    pub window: TimeWindow,
    /// How often the slot repeats.
    pub frequency: Frequency,
}

/// Up to three ranked preferences, in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSet {
    choices: Vec<RankedPreference>,
}

impl PreferenceSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next-ranked choice. Choices beyond rank 3 are ignored.
    pub fn with_choice(mut self, window: TimeWindow, frequency: Frequency) -> Self {
        if self.choices.len() < MAX_RANKS {
            let rank = self.choices.last().map_or(1, |c| c.rank + 1);
            self.choices.push(RankedPreference {
                rank,
                window,
                frequency,
            });
        }
        self
    }

    /// Parses host preferences given in rank order (index 0 = rank 1).
    ///
    /// Only the first three entries are looked at. Entries that fail to
    /// parse are skipped; the remaining ones keep their original rank.
    pub fn from_raw(raw: &[RawPreference]) -> Self {
        let choices = raw
            .iter()
            .take(MAX_RANKS)
            .zip(1u8..)
            .filter_map(|(pref, rank)| match pref.parse() {
                Ok((window, frequency)) => Some(RankedPreference {
                    rank,
                    window,
                    frequency,
                }),
                Err(err) => {
                    trace!(rank, %err, "skipping unusable preference");
                    None
                }
            })
            .collect();
        Self { choices }
    }

    /// Choices in rank order.
    pub fn choices(&self) -> &[RankedPreference] {
        &self.choices
    }

    /// The most preferred usable choice.
    pub fn first(&self) -> Option<&RankedPreference> {
        self.choices.first()
    }

    /// Whether no usable choice exists.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Number of usable choices.
    pub fn len(&self) -> usize {
        self.choices.len()
    }
}

/// Someone to be placed into a weekly slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier supplied by the host.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ranked preferences.
    pub preferences: PreferenceSet,
}

impl Participant {
    /// Creates a participant without preferences.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            preferences: PreferenceSet::new(),
        }
    }

    /// Appends the next-ranked preference.
    pub fn with_choice(mut self, window: TimeWindow, frequency: Frequency) -> Self {
        self.preferences = self.preferences.with_choice(window, frequency);
        self
    }

    /// Replaces preferences with those parsed from host input.
    pub fn with_raw_preferences(mut self, raw: &[RawPreference]) -> Self {
        self.preferences = PreferenceSet::from_raw(raw);
        self
    }
}

/// Participant payload as sent by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantInput {
    /// Identifier.
    pub id: String,
    /// Display name. Defaults to the id.
    #[serde(default)]
    pub name: Option<String>,
    /// Ranked preferences, most preferred first.
    #[serde(default)]
    pub preferences: Vec<RawPreference>,
}

impl From<ParticipantInput> for Participant {
    fn from(input: ParticipantInput) -> Self {
        let name = input.name.unwrap_or_else(|| input.id.clone());
        Participant::new(input.id, name).with_raw_preferences(&input.preferences)
    }
}
