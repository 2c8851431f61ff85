//! overlap-store: JSON-file persistence gateway for the scheduling engine.
//!
//! One repository object owns one data file. The full scope -> events map is
//! read once at open and served from memory; every mutation rewrites the
//! whole file through a temp-then-rename so readers never observe a
//! half-written aggregate and a crash mid-write leaves the previous file in
//! place.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use overlap_core::{Event, EventStore, Result, ScheduleError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ScopeRecord {
    #[serde(default)]
    events: BTreeMap<String, Event>,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    scopes: BTreeMap<String, ScopeRecord>,
}

impl JsonFileStore {
    /// Open (or create) the store at `path`. Parent directories are created
    /// as needed; a missing file means an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }

        let scopes = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        let store = Self { path, scopes };
        tracing::info!(
            path = %store.path.display(),
            scopes = store.scopes.len(),
            "event store opened"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.scopes).context("serialize events")?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "event store written");
        Ok(())
    }
}

impl EventStore for JsonFileStore {
    fn load(&self, scope: &str, event_id: &str) -> Result<Event> {
        self.scopes
            .get(scope)
            .and_then(|record| record.events.get(event_id))
            .cloned()
            .ok_or_else(|| ScheduleError::NotFound(format!("event {event_id} in scope {scope}")))
    }

    fn save(&mut self, event: &Event) -> Result<()> {
        self.scopes
            .entry(event.scope_id.clone())
            .or_default()
            .events
            .insert(event.event_id.clone(), event.clone());
        self.persist()
    }

    fn delete(&mut self, scope: &str, event_id: &str) -> Result<Event> {
        let removed = self
            .scopes
            .get_mut(scope)
            .and_then(|record| record.events.remove(event_id))
            .ok_or_else(|| {
                ScheduleError::NotFound(format!("event {event_id} in scope {scope}"))
            })?;
        self.persist()?;
        Ok(removed)
    }

    fn events_in_scope(&self, scope: &str) -> Result<Vec<Event>> {
        Ok(self
            .scopes
            .get(scope)
            .map(|record| record.events.values().cloned().collect())
            .unwrap_or_default())
    }
}
