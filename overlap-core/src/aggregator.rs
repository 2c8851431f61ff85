//! Availability aggregator — read model over a slot->queue map.
//!
//! Converts slot keys into a participant's local frame, buckets them by
//! local calendar date, and merges temporally adjacent slots into display
//! ranges carrying peak occupancy. Pure functions; the caller renders.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::queue::SlotQueue;
use crate::time::{self, SlotKey};

/// One slot re-expressed in a participant's timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedSlot {
    pub key: SlotKey,
    pub local: DateTime<Tz>,
    pub hour_label: String,
    pub headcount: usize,
}

/// All slots falling on one local calendar date, ordered by local time.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDateGroup {
    pub date: NaiveDate,
    pub date_label: String,
    pub slots: Vec<LocalizedSlot>,
}

/// A merged, human-facing interval of adjacent slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Peak concurrent headcount among merged slots — not the sum.
    pub max_occupancy: usize,
}

/// Bucket availability by local calendar date. Buckets come out in
/// chronological date order (not label order); slots within a bucket are
/// ordered by local time.
pub fn group_by_local_date(
    availability: &BTreeMap<SlotKey, SlotQueue>,
    tz: &str,
) -> Result<Vec<LocalDateGroup>> {
    let zone = time::parse_timezone(tz)?;

    let mut buckets: BTreeMap<NaiveDate, Vec<LocalizedSlot>> = BTreeMap::new();
    for (key, queue) in availability {
        let local = key.as_utc().with_timezone(&zone);
        buckets.entry(local.date_naive()).or_default().push(LocalizedSlot {
            key: *key,
            local,
            hour_label: time::hour_label(&local),
            headcount: queue.len(),
        });
    }

    Ok(buckets
        .into_iter()
        .map(|(date, mut slots)| {
            slots.sort_by_key(|s| s.local);
            LocalDateGroup {
                date,
                date_label: time::date_label(date),
                slots,
            }
        })
        .collect())
}

/// Merge hour slots into ranges. A slot joins the open range when its start
/// is within `slack` of the range end; the slack absorbs rounding from the
/// hour-truncation step. Input must be sorted by start time.
pub fn merge_consecutive<I>(slots: I, slack: Duration) -> Vec<DisplayRange>
where
    I: IntoIterator<Item = (DateTime<Utc>, usize)>,
{
    let hour = Duration::hours(1);
    let mut out: Vec<DisplayRange> = Vec::new();

    for (start, headcount) in slots {
        match out.last_mut() {
            Some(open) if start <= open.end + slack => {
                open.end = start + hour;
                open.max_occupancy = open.max_occupancy.max(headcount);
            }
            _ => out.push(DisplayRange {
                start,
                end: start + hour,
                max_occupancy: headcount,
            }),
        }
    }

    out
}

/// [`merge_consecutive`] over a whole availability map (keys are already
/// sorted).
pub fn merge_availability(
    availability: &BTreeMap<SlotKey, SlotQueue>,
    slack: Duration,
) -> Vec<DisplayRange> {
    merge_consecutive(
        availability.iter().map(|(k, q)| (k.as_utc(), q.len())),
        slack,
    )
}
