//! Availability-pattern memory — remembers when a participant tends to be
//! free so new events can pre-suggest slots.
//!
//! Patterns live in the participant's local frame as (weekday, hour)
//! counters: recording and suggesting both localize through the same zone,
//! so a "Tuesdays at 7 PM" habit survives events proposed in any timezone.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::time::{self, SlotKey};

/// One habitual slot: local weekday (0 = Monday) and local hour (0-23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPattern {
    pub weekday: u8,
    pub hour: u8,
    pub count: u32,
    pub last_used: DateTime<Utc>,
}

/// A participant's recorded availability habits within one scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternMemory {
    patterns: Vec<SlotPattern>,
}

impl PatternMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[SlotPattern] {
        &self.patterns
    }

    /// Fold a batch of selected slots into the counters.
    pub fn record(&mut self, slots: &[SlotKey], tz: &str, now: DateTime<Utc>) -> Result<()> {
        let zone = time::parse_timezone(tz)?;
        for key in slots {
            let local = key.as_utc().with_timezone(&zone);
            let weekday = local.weekday().num_days_from_monday() as u8;
            let hour = local.hour() as u8;

            match self.patterns.iter_mut().find(|p| p.weekday == weekday && p.hour == hour) {
                Some(p) => {
                    p.count += 1;
                    p.last_used = now;
                }
                None => self.patterns.push(SlotPattern {
                    weekday,
                    hour,
                    count: 1,
                    last_used: now,
                }),
            }
        }
        Ok(())
    }

    /// Patterns seen at least `min_count` times, most frequent first.
    pub fn frequent(&self, min_count: u32) -> Vec<&SlotPattern> {
        let mut out: Vec<&SlotPattern> =
            self.patterns.iter().filter(|p| p.count >= min_count).collect();
        out.sort_by(|a, b| b.count.cmp(&a.count));
        out
    }

    /// Filter proposed slots down to the ones matching a frequent pattern.
    /// Only ever returns members of `proposed`.
    pub fn suggest(
        &self,
        proposed: &[SlotKey],
        tz: &str,
        min_count: u32,
    ) -> Result<Vec<SlotKey>> {
        let zone = time::parse_timezone(tz)?;
        let habitual: Vec<(u8, u8)> =
            self.frequent(min_count).iter().map(|p| (p.weekday, p.hour)).collect();
        if habitual.is_empty() {
            return Ok(Vec::new());
        }

        Ok(proposed
            .iter()
            .copied()
            .filter(|key| {
                let local = key.as_utc().with_timezone(&zone);
                let slot = (local.weekday().num_days_from_monday() as u8, local.hour() as u8);
                habitual.contains(&slot)
            })
            .collect())
    }

    pub fn stats(&self) -> PatternStats {
        PatternStats {
            total_patterns: self.patterns.len(),
            total_selections: self.patterns.iter().map(|p| p.count).sum(),
            frequent_count: self.frequent(2).len(),
            last_updated: self.patterns.iter().map(|p| p.last_used).max(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternStats {
    pub total_patterns: usize,
    pub total_selections: u32,
    pub frequent_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-05-07 is a Tuesday.
    fn tuesday_7pm_chicago(week: u32) -> SlotKey {
        let day = 7 + 7 * week;
        time::local_to_utc_slot(
            &format!("Tuesday, 05/{day:02}/24 at 7 PM"),
            "America/Chicago",
        )
        .unwrap()
    }

    #[test]
    fn recording_increments_matching_pattern() {
        let now = Utc::now();
        let mut mem = PatternMemory::new();
        mem.record(&[tuesday_7pm_chicago(0)], "America/Chicago", now).unwrap();
        mem.record(&[tuesday_7pm_chicago(1)], "America/Chicago", now).unwrap();

        assert_eq!(mem.patterns().len(), 1);
        assert_eq!(mem.patterns()[0].count, 2);
        assert_eq!(mem.patterns()[0].weekday, 1);
        assert_eq!(mem.patterns()[0].hour, 19);
    }

    #[test]
    fn suggestions_are_a_subset_of_proposed() {
        let now = Utc::now();
        let mut mem = PatternMemory::new();
        mem.record(&[tuesday_7pm_chicago(0)], "America/Chicago", now).unwrap();
        mem.record(&[tuesday_7pm_chicago(1)], "America/Chicago", now).unwrap();

        let habitual = tuesday_7pm_chicago(2);
        let off_habit =
            time::local_to_utc_slot("Wednesday, 05/22/24 at 9 AM", "America/Chicago").unwrap();
        let proposed = vec![habitual, off_habit];

        let suggested = mem.suggest(&proposed, "America/Chicago", 2).unwrap();
        assert_eq!(suggested, vec![habitual]);
    }

    #[test]
    fn below_min_count_suggests_nothing() {
        let now = Utc::now();
        let mut mem = PatternMemory::new();
        mem.record(&[tuesday_7pm_chicago(0)], "America/Chicago", now).unwrap();

        let suggested = mem
            .suggest(&[tuesday_7pm_chicago(1)], "America/Chicago", 2)
            .unwrap();
        assert!(suggested.is_empty());
    }

    #[test]
    fn stats_aggregate_counters() {
        let now = Utc::now();
        let mut mem = PatternMemory::new();
        mem.record(&[tuesday_7pm_chicago(0)], "America/Chicago", now).unwrap();
        mem.record(&[tuesday_7pm_chicago(1)], "America/Chicago", now).unwrap();
        let morning =
            time::local_to_utc_slot("Wednesday, 05/08/24 at 9 AM", "America/Chicago").unwrap();
        mem.record(&[morning], "America/Chicago", now).unwrap();

        let stats = mem.stats();
        assert_eq!(stats.total_patterns, 2);
        assert_eq!(stats.total_selections, 3);
        assert_eq!(stats.frequent_count, 1);
        assert_eq!(stats.last_updated, Some(now));
    }
}
