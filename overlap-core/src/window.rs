//! Proposal window — the fixed span of candidate dates an organizer picks
//! from when creating an event.
//!
//! The window is aligned to the start of the week (Sunday) on or before the
//! anchor date and runs `window_days` consecutive days. The span is a product
//! constraint (it keeps the date-picker pagination fixed-size), so it is
//! configurable rather than hard-coded.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{Result, ScheduleError};

/// Sunday on or before the given date.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Candidate dates for a new event. `anchor` defaults to `today`; an anchor
/// strictly before `today` is rejected before anything else happens.
pub fn proposal_window(
    anchor: Option<NaiveDate>,
    today: NaiveDate,
    window_days: u32,
) -> Result<Vec<NaiveDate>> {
    let anchor = anchor.unwrap_or(today);
    if anchor < today {
        return Err(ScheduleError::PastDate(anchor));
    }

    let start = week_start(anchor);
    Ok((0..window_days as i64).map(|i| start + Duration::days(i)).collect())
}
