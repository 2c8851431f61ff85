//! Scheduling engine — caller-facing load -> mutate -> save coordination.
//!
//! Generic over the persistence gateway and the authorization collaborator;
//! the engine itself owns no I/O and evaluates no role membership. Each
//! operation runs to completion synchronously. Hosts must serialize
//! concurrent mutations to the same event id (the batch submit is a
//! read-modify-write); mutations on different events are independent.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregator::{self, DisplayRange, LocalDateGroup};
use crate::auth::{Authorizer, PermissionLevel};
use crate::config::EngineConfig;
use crate::error::{Result, ScheduleError};
use crate::event::Event;
use crate::ranker::{self, Attendance, OverlapPager};
use crate::store::{filter_by_name, EventStore};
use crate::time::{self, SlotKey};
use crate::window;

pub struct SchedulingEngine<S: EventStore, A: Authorizer> {
    store: S,
    auth: A,
    config: EngineConfig,
}

impl<S: EventStore, A: Authorizer> SchedulingEngine<S, A> {
    pub fn new(store: S, auth: A, config: EngineConfig) -> Self {
        Self { store, auth, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Candidate dates for a new proposal. Rejects past anchors before
    /// anything is touched.
    pub fn proposal_window(
        &self,
        anchor: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        window::proposal_window(anchor, today, self.config.window_days)
    }

    /// Persist a freshly built aggregate. The display name must be unique
    /// within its scope.
    pub fn create_event(&mut self, mut event: Event) -> Result<Event> {
        let existing = self.store.events_in_scope(&event.scope_id)?;
        if existing.iter().any(|e| {
            e.event_id == event.event_id || e.name.eq_ignore_ascii_case(&event.name)
        }) {
            return Err(ScheduleError::AlreadyExists(event.name));
        }

        if event.capacity.is_none() {
            event.capacity = self.config.default_capacity;
        }

        self.store.save(&event)?;
        tracing::info!(scope = %event.scope_id, event = %event.event_id, "event created");
        Ok(event)
    }

    /// Organizer-only: replace the candidate date set. Every date must be on
    /// or after `today`; validation happens before any state changes.
    pub fn set_event_dates(
        &mut self,
        scope: &str,
        event_id: &str,
        actor: &str,
        dates: Vec<NaiveDate>,
        tz: &str,
        today: NaiveDate,
    ) -> Result<Event> {
        if let Some(past) = dates.iter().copied().filter(|d| *d < today).min() {
            return Err(ScheduleError::PastDate(past));
        }

        let mut event = self.store.load(scope, event_id)?;
        self.authorize(&event, actor, PermissionLevel::Organizer)?;

        event.set_proposed_dates(dates, tz)?;
        self.store.save(&event)?;
        Ok(event)
    }

    /// Organizer-only: register hour slots from local descriptions in the
    /// organizer's zone. All descriptions are parsed before the first queue
    /// is created, so a bad one leaves the event untouched.
    pub fn add_slots(
        &mut self,
        scope: &str,
        event_id: &str,
        actor: &str,
        tz: &str,
        descriptions: &[&str],
    ) -> Result<Event> {
        let keys = descriptions
            .iter()
            .map(|d| time::local_to_utc_slot(d, tz))
            .collect::<Result<Vec<SlotKey>>>()?;

        let mut event = self.store.load(scope, event_id)?;
        self.authorize(&event, actor, PermissionLevel::Organizer)?;

        event.add_slots(keys);
        self.store.save(&event)?;
        Ok(event)
    }

    /// Flip one participant/slot pairing and persist.
    pub fn toggle_slot(
        &mut self,
        scope: &str,
        event_id: &str,
        participant: &str,
        key: SlotKey,
    ) -> Result<Event> {
        let mut event = self.store.load(scope, event_id)?;
        let present = event.toggle_slot(participant, key);
        self.store.save(&event)?;
        tracing::debug!(
            scope,
            event = event_id,
            participant,
            slot = %key,
            present,
            "availability toggled"
        );
        Ok(event)
    }

    /// The participant ends up available in exactly `selected`; everything
    /// else is cleared. Idempotent.
    pub fn submit_availability(
        &mut self,
        scope: &str,
        event_id: &str,
        participant: &str,
        selected: &BTreeSet<SlotKey>,
    ) -> Result<Event> {
        let mut event = self.store.load(scope, event_id)?;
        event.submit_batch(participant, selected);
        self.store.save(&event)?;
        tracing::debug!(
            scope,
            event = event_id,
            participant,
            slots = selected.len(),
            "availability batch submitted"
        );
        Ok(event)
    }

    /// Organizer-only: record the final decision. Proposed slots and
    /// availability stay intact.
    pub fn confirm_date(
        &mut self,
        scope: &str,
        event_id: &str,
        actor: &str,
        keys: Vec<SlotKey>,
    ) -> Result<Event> {
        let mut event = self.store.load(scope, event_id)?;
        self.authorize(&event, actor, PermissionLevel::Organizer)?;

        event.confirm(keys);
        self.store.save(&event)?;
        Ok(event)
    }

    /// Organizer or admin. Returns the removed aggregate; cascading removal
    /// of external references (announcements, reminders) is the caller's.
    pub fn delete_event(&mut self, scope: &str, event_id: &str, actor: &str) -> Result<Event> {
        let event = self.store.load(scope, event_id)?;
        self.authorize(&event, actor, PermissionLevel::Admin)?;

        let removed = self.store.delete(scope, event_id)?;
        tracing::info!(scope, event = event_id, actor, "event deleted");
        Ok(removed)
    }

    /// Exact name match first, then prefix, then substring.
    pub fn find_by_name(&self, scope: &str, name: &str) -> Result<BTreeMap<String, Event>> {
        Ok(filter_by_name(self.store.events_in_scope(scope)?, name))
    }

    pub fn grouped_availability(
        &self,
        scope: &str,
        event_id: &str,
        tz: &str,
    ) -> Result<Vec<LocalDateGroup>> {
        let event = self.store.load(scope, event_id)?;
        aggregator::group_by_local_date(&event.availability, tz)
    }

    pub fn merged_ranges(&self, scope: &str, event_id: &str) -> Result<Vec<DisplayRange>> {
        let event = self.store.load(scope, event_id)?;
        Ok(aggregator::merge_availability(&event.availability, self.config.merge_slack()))
    }

    pub fn overlap_view(&self, scope: &str, event_id: &str, tz: &str) -> Result<OverlapPager> {
        let groups = self.grouped_availability(scope, event_id, tz)?;
        Ok(OverlapPager::new(groups, self.config.dates_per_page, self.config.times_per_page))
    }

    /// Who is available for a slot, registered first, then waitlisted.
    pub fn attendees(&self, scope: &str, event_id: &str, key: &SlotKey) -> Result<Vec<Attendance>> {
        let event = self.store.load(scope, event_id)?;
        let queue = event
            .queue(key)
            .ok_or_else(|| ScheduleError::NotFound(format!("slot {key} in event {event_id}")))?;
        Ok(ranker::attendees_of(queue, event.capacity))
    }

    /// Organizer fast-path, then the collaborator; anything but an
    /// affirmative answer denies.
    fn authorize(&self, event: &Event, actor: &str, level: PermissionLevel) -> Result<()> {
        if actor == event.organizer {
            return Ok(());
        }

        match self.auth.has_permission(actor, &event.organizer, level) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ScheduleError::PermissionDenied(format!(
                "{actor} needs {level} rights on '{}'",
                event.name
            ))),
            Err(err) => {
                tracing::warn!(actor, event = %event.event_id, %err, "authorizer failed; denying");
                Err(ScheduleError::PermissionDenied(format!(
                    "{actor} could not be verified for '{}'",
                    event.name
                )))
            }
        }
    }
}
