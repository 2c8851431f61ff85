//! Time codec: local wall-clock descriptions <-> canonical UTC slot keys.
//!
//! A slot key names one hour-long window. Keys are built by truncating the
//! *local* wall clock to the top of the hour and then converting to UTC, so
//! the round trip holds even in zones with :30/:45 offsets (the UTC instant
//! for such zones is not hour-aligned, and that is fine — the key is still
//! canonical per instant).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{Result, ScheduleError};

/// Canonical identifier for one proposable time window, UTC, hour granularity.
///
/// Ordered by wall-clock time; serialized as an RFC 3339 UTC string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey(DateTime<Utc>);

impl SlotKey {
    /// Build a key from an instant already expressed in UTC.
    /// Sub-hour components are dropped.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let date = dt.date_naive();
        let hour = NaiveTime::from_hms_opt(dt.hour(), 0, 0).unwrap_or_default();
        SlotKey(Utc.from_utc_datetime(&NaiveDateTime::new(date, hour)))
    }

    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// End of the hour-long window this key denotes.
    pub fn window_end(&self) -> DateTime<Utc> {
        self.0 + chrono::Duration::hours(1)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// A slot key re-expressed in a participant's timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSlot {
    /// e.g. "Monday, 05/12/25"
    pub date_label: String,
    /// e.g. "3 PM"
    pub hour_label: String,
    pub local: DateTime<Tz>,
}

/// "Monday, 05/12/25 at 3 PM" — also accepts "3:30 PM" (minutes truncated)
/// and the compact "3PM". The weekday token is display-only and is not
/// cross-validated against the calendar date.
fn description_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)^\s*(?P<weekday>[A-Za-z]+),\s*",
            r"(?P<month>\d{1,2})/(?P<day>\d{1,2})/(?P<year>\d{2})\s+at\s+",
            r"(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<meridiem>AM|PM)\s*$"
        ))
        .expect("slot description pattern is valid")
    })
}

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse::<Tz>()
        .map_err(|_| ScheduleError::UnknownTimezone(tz.to_string()))
}

/// Parse a local date+hour description under an IANA zone into a slot key.
///
/// Fails with `InvalidTimeFormat` on an unrecognized description,
/// `UnknownTimezone` on a bad zone id, and `AmbiguousLocalTime` when the
/// local time falls in a DST gap or fold.
pub fn local_to_utc_slot(description: &str, tz: &str) -> Result<SlotKey> {
    let zone = parse_timezone(tz)?;
    let naive = parse_local_description(description)?;

    let localized = zone
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ScheduleError::AmbiguousLocalTime(format!("{description} {tz}")))?;

    Ok(SlotKey(localized.with_timezone(&Utc)))
}

/// Inverse of [`local_to_utc_slot`]: re-express a key in a participant's
/// zone, with the labels the UI layer hands back to us verbatim.
pub fn slot_to_local(key: SlotKey, tz: &str) -> Result<LocalSlot> {
    let zone = parse_timezone(tz)?;
    let local = key.as_utc().with_timezone(&zone);
    Ok(LocalSlot {
        date_label: date_label(local.date_naive()),
        hour_label: hour_label(&local),
        local,
    })
}

/// "Monday, 05/12/25"
pub fn date_label(date: NaiveDate) -> String {
    date.format("%A, %m/%d/%y").to_string()
}

/// "3 PM" — no zero padding, space before the meridiem.
pub fn hour_label<T: TimeZone>(dt: &DateTime<T>) -> String {
    let (is_pm, hour12) = dt.hour12();
    format!("{} {}", hour12, if is_pm { "PM" } else { "AM" })
}

fn parse_local_description(description: &str) -> Result<NaiveDateTime> {
    let invalid = || ScheduleError::InvalidTimeFormat(description.to_string());

    let caps = description_re().captures(description).ok_or_else(invalid)?;

    let month: u32 = caps["month"].parse().map_err(|_| invalid())?;
    let day: u32 = caps["day"].parse().map_err(|_| invalid())?;
    let year: i32 = caps["year"].parse().map_err(|_| invalid())?;
    let hour12: u32 = caps["hour"].parse().map_err(|_| invalid())?;

    if !(1..=12).contains(&hour12) {
        return Err(invalid());
    }
    // Minutes, if given, must be a valid minute-of-hour; they are then
    // truncated to the top of the hour for slot purposes.
    if let Some(m) = caps.name("minute") {
        let minute: u32 = m.as_str().parse().map_err(|_| invalid())?;
        if minute > 59 {
            return Err(invalid());
        }
    }

    let hour = match (hour12, caps["meridiem"].to_ascii_uppercase().as_str()) {
        (12, "AM") => 0,
        (h, "AM") => h,
        (12, "PM") => 12,
        (h, "PM") => h + 12,
        _ => return Err(invalid()),
    };

    let date = NaiveDate::from_ymd_opt(2000 + year, month, day).ok_or_else(invalid)?;
    let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(invalid)?;
    Ok(NaiveDateTime::new(date, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parse_chicago_afternoon() {
        // May is CDT (UTC-5).
        let key = local_to_utc_slot("Monday, 05/12/25 at 3 PM", "America/Chicago").unwrap();
        assert_eq!(key.to_string(), "2025-05-12T20:00:00+00:00");
    }

    #[test]
    fn minutes_truncate_to_top_of_hour() {
        let a = local_to_utc_slot("Monday, 05/12/25 at 3:00 PM", "America/Chicago").unwrap();
        let b = local_to_utc_slot("Monday, 05/12/25 at 3:45 PM", "America/Chicago").unwrap();
        let c = local_to_utc_slot("Monday, 05/12/25 at 3PM", "America/Chicago").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn midnight_and_noon() {
        let midnight = local_to_utc_slot("Monday, 05/12/25 at 12 AM", "UTC").unwrap();
        assert_eq!(midnight.as_utc().hour(), 0);
        let noon = local_to_utc_slot("Monday, 05/12/25 at 12 PM", "UTC").unwrap();
        assert_eq!(noon.as_utc().hour(), 12);
    }

    #[test]
    fn rejects_garbage_and_bad_zone() {
        assert!(matches!(
            local_to_utc_slot("next tuesday sometime", "UTC"),
            Err(ScheduleError::InvalidTimeFormat(_))
        ));
        assert!(matches!(
            local_to_utc_slot("Monday, 05/12/25 at 3 PM", "Mars/Olympus"),
            Err(ScheduleError::UnknownTimezone(_))
        ));
        assert!(matches!(
            local_to_utc_slot("Monday, 13/40/25 at 3 PM", "UTC"),
            Err(ScheduleError::InvalidTimeFormat(_))
        ));
    }

    #[test]
    fn dst_gap_is_rejected() {
        // 2 AM on 2025-03-09 does not exist in America/New_York.
        let err = local_to_utc_slot("Sunday, 03/09/25 at 2 AM", "America/New_York").unwrap_err();
        assert!(matches!(err, ScheduleError::AmbiguousLocalTime(_)));
    }

    #[test]
    fn weekday_token_is_display_only() {
        // 05/12/25 is a Monday; a mislabeled weekday still parses.
        let a = local_to_utc_slot("Friday, 05/12/25 at 3 PM", "UTC").unwrap();
        let b = local_to_utc_slot("Monday, 05/12/25 at 3 PM", "UTC").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn round_trip_whole_hour_zone() {
        let tz = "America/Chicago";
        let key = local_to_utc_slot("Monday, 05/12/25 at 3 PM", tz).unwrap();
        let local = slot_to_local(key, tz).unwrap();
        assert_eq!(local.date_label, "Monday, 05/12/25");
        assert_eq!(local.hour_label, "3 PM");

        let reparsed =
            local_to_utc_slot(&format!("{} at {}", local.date_label, local.hour_label), tz)
                .unwrap();
        assert_eq!(reparsed, key);
    }

    #[test]
    fn round_trip_half_hour_zone() {
        // Asia/Kolkata is UTC+5:30; the key lands at :30 UTC but the local
        // hour must survive the round trip.
        let tz = "Asia/Kolkata";
        let key = local_to_utc_slot("Monday, 05/12/25 at 9 AM", tz).unwrap();
        assert_eq!(key.as_utc().minute(), 30);

        let local = slot_to_local(key, tz).unwrap();
        assert_eq!(local.date_label, "Monday, 05/12/25");
        assert_eq!(local.hour_label, "9 AM");
    }

    #[test]
    fn from_utc_truncates_sub_hour() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 14, 37, 12).unwrap();
        let key = SlotKey::from_utc(dt);
        assert_eq!(key.to_string(), "2024-05-01T14:00:00+00:00");
        assert_eq!(key.window_end(), Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap());
    }

    #[test]
    fn slot_key_serde_is_a_string() {
        let key = SlotKey::from_utc(Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap());
        let json = serde_json::to_string(&key).unwrap();
        assert!(json.starts_with("\"2024-05-01T14:00:00"));
        let back: SlotKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn keys_order_by_time() {
        let a = SlotKey::from_utc(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        let b = SlotKey::from_utc(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap());
        assert!(a < b);
    }

    #[test]
    fn labels_for_utc_morning() {
        let key = SlotKey::from_utc(Utc.with_ymd_and_hms(2025, 5, 12, 9, 0, 0).unwrap());
        let local = slot_to_local(key, "UTC").unwrap();
        assert_eq!(local.hour_label, "9 AM");
        assert_eq!(local.local.weekday(), chrono::Weekday::Mon);
    }
}
