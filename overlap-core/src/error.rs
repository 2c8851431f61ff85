//! Error taxonomy for the scheduling engine.
//!
//! Validation errors (time format, timezone, past date) are raised before any
//! mutation is applied. Authorization failures short-circuit before touching
//! an aggregate. Storage errors pass through opaquely; retry policy belongs
//! to the caller.

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The local time description matched none of the accepted patterns.
    #[error("invalid time format: '{0}'")]
    InvalidTimeFormat(String),

    /// Not a valid IANA timezone identifier.
    #[error("unknown timezone: '{0}'")]
    UnknownTimezone(String),

    /// The local time falls in a DST gap or fold; we never guess an offset.
    #[error("ambiguous or invalid local time (DST?): '{0}'")]
    AmbiguousLocalTime(String),

    /// Proposal anchor strictly before the evaluation date.
    #[error("cannot propose dates in the past: {0}")]
    PastDate(NaiveDate),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate event name within a scope.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Settings toggle name outside the recognized set.
    #[error("unknown option: '{0}'")]
    UnknownOption(String),

    /// Opaque passthrough from the persistence gateway.
    #[error("storage error")]
    Storage(#[from] anyhow::Error),
}

impl ScheduleError {
    /// True for errors the caller can fix by correcting its input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScheduleError::InvalidTimeFormat(_)
                | ScheduleError::UnknownTimezone(_)
                | ScheduleError::AmbiguousLocalTime(_)
                | ScheduleError::PastDate(_)
                | ScheduleError::UnknownOption(_)
        )
    }
}
