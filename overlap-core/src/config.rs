//! Engine configuration — window span, pagination sizes, merge slack,
//! capacity defaults, and the per-scope feature toggles.
//!
//! Toggles are named fields resolved through a `match` over a closed set of
//! option names; there is no reflection or by-string attribute access.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of the proposal window in days.
    pub window_days: u32,
    /// Dates shown per page in the overlap view.
    pub dates_per_page: usize,
    /// Time slots shown per date row in the overlap view.
    pub times_per_page: usize,
    /// Slack absorbed when merging adjacent slots into display ranges.
    pub merge_slack_minutes: i64,
    /// Default per-slot registration capacity; None = unbounded.
    pub default_capacity: Option<u32>,

    // Feature toggles, per scope.
    pub permissions_enabled: bool,
    pub bulletins_enabled: bool,
    pub display_enabled: bool,
    pub notifications_enabled: bool,
    pub default_reminder_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: 14,
            dates_per_page: 4,
            times_per_page: 4,
            merge_slack_minutes: 5,
            default_capacity: None,
            permissions_enabled: true,
            bulletins_enabled: false,
            display_enabled: true,
            notifications_enabled: true,
            default_reminder_minutes: 60,
        }
    }
}

impl EngineConfig {
    pub fn merge_slack(&self) -> Duration {
        Duration::minutes(self.merge_slack_minutes)
    }

    /// Set a feature toggle by name. Unrecognized names fail with
    /// `UnknownOption`.
    pub fn set_toggle(&mut self, name: &str, value: bool) -> Result<()> {
        match name {
            "permissions_enabled" => self.permissions_enabled = value,
            "bulletins_enabled" => self.bulletins_enabled = value,
            "display_enabled" => self.display_enabled = value,
            "notifications_enabled" => self.notifications_enabled = value,
            _ => return Err(ScheduleError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Read a feature toggle by name.
    pub fn toggle(&self, name: &str) -> Result<bool> {
        match name {
            "permissions_enabled" => Ok(self.permissions_enabled),
            "bulletins_enabled" => Ok(self.bulletins_enabled),
            "display_enabled" => Ok(self.display_enabled),
            "notifications_enabled" => Ok(self.notifications_enabled),
            _ => Err(ScheduleError::UnknownOption(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_constraints() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.window_days, 14);
        assert_eq!(cfg.dates_per_page, 4);
        assert_eq!(cfg.times_per_page, 4);
        assert_eq!(cfg.merge_slack(), Duration::minutes(5));
        assert_eq!(cfg.default_capacity, None);
    }

    #[test]
    fn toggles_flip_by_name() {
        let mut cfg = EngineConfig::default();
        cfg.set_toggle("bulletins_enabled", true).unwrap();
        assert!(cfg.toggle("bulletins_enabled").unwrap());
        cfg.set_toggle("notifications_enabled", false).unwrap();
        assert!(!cfg.notifications_enabled);
    }

    #[test]
    fn unknown_toggle_name_is_rejected() {
        let mut cfg = EngineConfig::default();
        let err = cfg.set_toggle("embed_color", true).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownOption(name) if name == "embed_color"));
        assert!(cfg.toggle("embed_color").is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"window_days": 7}"#).unwrap();
        assert_eq!(cfg.window_days, 7);
        assert_eq!(cfg.dates_per_page, 4);
        assert!(cfg.permissions_enabled);
    }
}
