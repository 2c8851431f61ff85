//! overlap-core: availability aggregation and slot-queue engine for group
//! scheduling.
//!
//! Organizers propose candidate time slots, participants mark per-slot
//! availability, and the engine aggregates across timezones: canonical UTC
//! slot keys, dense FIFO queues with capacity-derived waitlisting, adjacent
//! -slot merging, and popularity ranking with clamped pagination. No UI, no
//! transport — a chat layer (or anything else) drives it through
//! [`SchedulingEngine`] and renders from the read models.

pub mod aggregator;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod patterns;
pub mod queue;
pub mod ranker;
pub mod store;
pub mod time;
pub mod window;

pub use aggregator::{
    group_by_local_date, merge_availability, merge_consecutive, DisplayRange, LocalDateGroup,
    LocalizedSlot,
};
pub use auth::{Authorizer, DenyAll, PermissionLevel};
pub use config::EngineConfig;
pub use engine::SchedulingEngine;
pub use error::{Result, ScheduleError};
pub use event::{Event, Recurrence, RecurrenceRule};
pub use patterns::{PatternMemory, PatternStats, SlotPattern};
pub use queue::SlotQueue;
pub use ranker::{attendees_of, rank_by_headcount, Attendance, OverlapPager, PageRow};
pub use store::{filter_by_name, EventStore, MemoryStore};
pub use time::{local_to_utc_slot, slot_to_local, LocalSlot, SlotKey};
pub use window::{proposal_window, week_start};
