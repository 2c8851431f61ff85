//! Event aggregate — proposed slots, per-slot queues, derived RSVP set,
//! confirmation metadata, capacity, recurrence.
//!
//! Every mutation re-derives `rsvp` from availability before returning, so
//! `rsvp == {p : p appears in any queue}` holds for all reachable states.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::queue::SlotQueue;
use crate::time::{self, SlotKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceRule {
    #[default]
    None,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

/// First-class recurrence. Occurrence counting is the caller's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recurrence {
    pub rule: RecurrenceRule,
    pub interval: u32,
    pub end_date: Option<NaiveDate>,
    pub occurrences: Option<u32>,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            rule: RecurrenceRule::None,
            interval: 1,
            end_date: None,
            occurrences: None,
        }
    }
}

impl Recurrence {
    /// The next occurrence date strictly after `from`, honoring `end_date`.
    pub fn next_occurrence(&self, from: NaiveDate) -> Option<NaiveDate> {
        let step = self.interval.max(1);
        let next = match self.rule {
            RecurrenceRule::None => return None,
            RecurrenceRule::Daily => from + Duration::days(step as i64),
            RecurrenceRule::Weekly => from + Duration::days(7 * step as i64),
            RecurrenceRule::Biweekly => from + Duration::days(14 * step as i64),
            RecurrenceRule::Monthly => from.checked_add_months(Months::new(step))?,
        };
        match self.end_date {
            Some(end) if next > end => None,
            _ => Some(next),
        }
    }
}

/// One schedulable event within a scope (guild / workspace).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub scope_id: String,
    pub event_id: String,
    /// Human display name, unique within the scope.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub organizer: String,
    #[serde(default)]
    pub organizer_display: String,
    /// Per-slot registration capacity; positions beyond it are waitlisted.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Organizer's final decision; empty means TBD.
    #[serde(default)]
    pub confirmed: Vec<SlotKey>,
    /// Date-only candidates awaiting hour selection.
    #[serde(default)]
    pub proposed_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub availability: BTreeMap<SlotKey, SlotQueue>,
    /// Derived: participants with at least one slot of availability.
    #[serde(default)]
    pub rsvp: BTreeSet<String>,
    #[serde(default)]
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        scope_id: impl Into<String>,
        event_id: impl Into<String>,
        name: impl Into<String>,
        organizer: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            scope_id: scope_id.into(),
            event_id: event_id.into(),
            name: name.into(),
            description: String::new(),
            organizer: organizer.into(),
            organizer_display: String::new(),
            capacity: None,
            confirmed: Vec::new(),
            proposed_dates: Vec::new(),
            availability: BTreeMap::new(),
            rsvp: BTreeSet::new(),
            recurrence: Recurrence::default(),
            created_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_organizer_display(mut self, display: impl Into<String>) -> Self {
        self.organizer_display = display.into();
        self
    }

    pub fn with_capacity(mut self, capacity: Option<u32>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn is_confirmed(&self) -> bool {
        !self.confirmed.is_empty()
    }

    pub fn queue(&self, key: &SlotKey) -> Option<&SlotQueue> {
        self.availability.get(key)
    }

    pub fn has_any_availability(&self, participant: &str) -> bool {
        self.availability.values().any(|q| q.contains(participant))
    }

    /// Replace the candidate date set. Slots whose local date (in the
    /// organizer's zone) is no longer proposed are dropped, signups
    /// included.
    pub fn set_proposed_dates(&mut self, dates: Vec<NaiveDate>, tz: &str) -> Result<()> {
        let zone = time::parse_timezone(tz)?;
        let keep: BTreeSet<NaiveDate> = dates.iter().copied().collect();

        self.availability
            .retain(|key, _| keep.contains(&key.as_utc().with_timezone(&zone).date_naive()));

        let mut dates = dates;
        dates.sort();
        dates.dedup();
        self.proposed_dates = dates;
        self.recompute_rsvp();
        Ok(())
    }

    /// Register candidate hour slots. Existing queues are kept as-is, so
    /// re-proposing a time never wipes its signups.
    pub fn add_slots<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = SlotKey>,
    {
        for key in keys {
            self.availability.entry(key).or_default();
        }
    }

    /// Add the participant to the slot's queue if absent, else remove.
    /// Returns true if the participant is present after the call.
    pub fn toggle_slot(&mut self, participant: &str, key: SlotKey) -> bool {
        let queue = self.availability.entry(key).or_default();
        let present = if queue.contains(participant) {
            queue.remove(participant);
            false
        } else {
            queue.add(participant);
            true
        };
        self.recompute_rsvp();
        present
    }

    /// The participant ends up in exactly the queues named by `selected`:
    /// added where missing, removed everywhere else. A pure function of
    /// `(self, participant, selected)` — applying it twice equals once.
    pub fn submit_batch(&mut self, participant: &str, selected: &BTreeSet<SlotKey>) {
        for key in selected {
            self.availability.entry(*key).or_default().add(participant);
        }
        for (key, queue) in self.availability.iter_mut() {
            if !selected.contains(key) {
                queue.remove(participant);
            }
        }
        self.recompute_rsvp();
    }

    /// Record the organizer's decision. Additive metadata only: proposed
    /// slots and availability stay untouched.
    pub fn confirm(&mut self, keys: Vec<SlotKey>) {
        self.confirmed = keys;
    }

    fn recompute_rsvp(&mut self) {
        self.rsvp = self
            .availability
            .values()
            .flat_map(|q| q.iter().map(str::to_string))
            .collect();
    }
}
