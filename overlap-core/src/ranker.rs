//! Overlap ranker — orders slots by popularity and pages them for display.
//!
//! Dates are paged in fixed-size groups and, within the visible dates, time
//! slots are paged in fixed-size rows. Every navigation move clamps: paging
//! past either end is a no-op, never an error, never a wrap.

use chrono::NaiveDate;

use crate::aggregator::{LocalDateGroup, LocalizedSlot};
use crate::queue::SlotQueue;

/// Sort slots descending by headcount; ties break ascending by time of day.
pub fn rank_by_headcount(slots: &[LocalizedSlot]) -> Vec<LocalizedSlot> {
    let mut ranked = slots.to_vec();
    ranked.sort_by(|a, b| b.headcount.cmp(&a.headcount).then(a.local.cmp(&b.local)));
    ranked
}

/// One participant's standing in a slot queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub participant: String,
    /// 1-based queue position.
    pub position: usize,
    pub registered: bool,
}

/// Who is available for a slot, in queue-position order — registered
/// entries first, waitlisted after, by construction.
pub fn attendees_of(queue: &SlotQueue, capacity: Option<u32>) -> Vec<Attendance> {
    queue
        .iter()
        .enumerate()
        .map(|(i, participant)| Attendance {
            participant: participant.to_string(),
            position: i + 1,
            registered: capacity.is_none_or(|cap| i < cap as usize),
        })
        .collect()
}

/// The slice of ranked slots visible for one date at the current time page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRow {
    pub date: NaiveDate,
    pub date_label: String,
    pub slots: Vec<LocalizedSlot>,
}

/// Clamped two-axis pager over ranked per-date slot lists.
#[derive(Debug, Clone)]
pub struct OverlapPager {
    groups: Vec<LocalDateGroup>,
    date_page: usize,
    time_page: usize,
    dates_per_page: usize,
    times_per_page: usize,
}

impl OverlapPager {
    pub fn new(groups: Vec<LocalDateGroup>, dates_per_page: usize, times_per_page: usize) -> Self {
        let groups = groups
            .into_iter()
            .map(|g| LocalDateGroup {
                slots: rank_by_headcount(&g.slots),
                ..g
            })
            .collect();
        Self {
            groups,
            date_page: 0,
            time_page: 0,
            dates_per_page: dates_per_page.max(1),
            times_per_page: times_per_page.max(1),
        }
    }

    pub fn date_page(&self) -> usize {
        self.date_page
    }

    pub fn time_page(&self) -> usize {
        self.time_page
    }

    pub fn total_date_pages(&self) -> usize {
        self.groups.len().div_ceil(self.dates_per_page).max(1)
    }

    fn visible_groups(&self) -> &[LocalDateGroup] {
        let start = (self.date_page * self.dates_per_page).min(self.groups.len());
        let end = (start + self.dates_per_page).min(self.groups.len());
        &self.groups[start..end]
    }

    /// Time-page count is driven by the widest date currently visible.
    pub fn total_time_pages(&self) -> usize {
        let widest = self.visible_groups().iter().map(|g| g.slots.len()).max().unwrap_or(0);
        widest.div_ceil(self.times_per_page).max(1)
    }

    /// The current page: each visible date with its visible slice of ranked
    /// slots.
    pub fn page(&self) -> Vec<PageRow> {
        let start = self.time_page * self.times_per_page;
        self.visible_groups()
            .iter()
            .map(|g| {
                let end = (start + self.times_per_page).min(g.slots.len());
                let slots = if start < g.slots.len() {
                    g.slots[start..end].to_vec()
                } else {
                    Vec::new()
                };
                PageRow {
                    date: g.date,
                    date_label: g.date_label.clone(),
                    slots,
                }
            })
            .collect()
    }

    pub fn next_date(&mut self) {
        self.date_page += 1;
        self.clamp();
    }

    pub fn prev_date(&mut self) {
        self.date_page = self.date_page.saturating_sub(1);
        self.clamp();
    }

    pub fn later_times(&mut self) {
        self.time_page += 1;
        self.clamp();
    }

    pub fn earlier_times(&mut self) {
        self.time_page = self.time_page.saturating_sub(1);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.date_page = self.date_page.min(self.total_date_pages() - 1);
        // Time bounds depend on the dates now visible.
        self.time_page = self.time_page.min(self.total_time_pages() - 1);
    }
}
