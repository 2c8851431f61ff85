//! Persistence gateway contract, name resolution, and an in-memory store.
//!
//! Stores persist whole aggregates: one save replaces the full record, so no
//! observer ever sees a half-written event. The engine only knows this
//! trait; file- or SQL-backed gateways live in their own crates.

use std::collections::BTreeMap;

use crate::error::{Result, ScheduleError};
use crate::event::Event;

pub trait EventStore {
    fn load(&self, scope: &str, event_id: &str) -> Result<Event>;

    /// Replace-the-whole-record write, atomic per aggregate.
    fn save(&mut self, event: &Event) -> Result<()>;

    /// Remove and return the aggregate. The caller owns cascading removal of
    /// any externally-tracked references.
    fn delete(&mut self, scope: &str, event_id: &str) -> Result<Event>;

    fn events_in_scope(&self, scope: &str) -> Result<Vec<Event>>;
}

/// Resolve an event name against a scope's events: a case-insensitive exact
/// match wins alone; otherwise prefix matches; otherwise substring matches.
/// An empty pattern returns everything.
pub fn filter_by_name(events: Vec<Event>, name: &str) -> BTreeMap<String, Event> {
    if name.is_empty() {
        return events.into_iter().map(|e| (e.name.clone(), e)).collect();
    }

    let needle = name.to_lowercase();

    if let Some(i) = events.iter().position(|e| e.name.to_lowercase() == needle) {
        let mut events = events;
        let e = events.swap_remove(i);
        return BTreeMap::from([(e.name.clone(), e)]);
    }

    let prefix: BTreeMap<String, Event> = events
        .iter()
        .filter(|e| e.name.to_lowercase().starts_with(&needle))
        .map(|e| (e.name.clone(), e.clone()))
        .collect();
    if !prefix.is_empty() {
        return prefix;
    }

    events
        .into_iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .map(|e| (e.name.clone(), e))
        .collect()
}

/// Store backed by nothing but a map. Engine tests use it; embedders that
/// bring their own durability can too.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scopes: BTreeMap<String, BTreeMap<String, Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryStore {
    fn load(&self, scope: &str, event_id: &str) -> Result<Event> {
        self.scopes
            .get(scope)
            .and_then(|events| events.get(event_id))
            .cloned()
            .ok_or_else(|| ScheduleError::NotFound(format!("event {event_id} in scope {scope}")))
    }

    fn save(&mut self, event: &Event) -> Result<()> {
        self.scopes
            .entry(event.scope_id.clone())
            .or_default()
            .insert(event.event_id.clone(), event.clone());
        Ok(())
    }

    fn delete(&mut self, scope: &str, event_id: &str) -> Result<Event> {
        self.scopes
            .get_mut(scope)
            .and_then(|events| events.remove(event_id))
            .ok_or_else(|| ScheduleError::NotFound(format!("event {event_id} in scope {scope}")))
    }

    fn events_in_scope(&self, scope: &str) -> Result<Vec<Event>> {
        Ok(self
            .scopes
            .get(scope)
            .map(|events| events.values().cloned().collect())
            .unwrap_or_default())
    }
}
