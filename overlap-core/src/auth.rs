//! Authorization seam.
//!
//! The engine never evaluates role membership itself. It asks a collaborator
//! whether a participant holds a named permission level, and fails closed on
//! any negative or error result. The organizer of an event always passes
//! checks against their own event.

use std::fmt;

/// Permission levels in order of increasing privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermissionLevel {
    Attendee,
    Organizer,
    Admin,
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionLevel::Attendee => "attendee",
            PermissionLevel::Organizer => "organizer",
            PermissionLevel::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

/// External role-membership oracle.
pub trait Authorizer {
    /// Does `participant` hold at least `level` with respect to the event
    /// owned by `organizer`? An `Err` is treated as a denial by callers.
    fn has_permission(
        &self,
        participant: &str,
        organizer: &str,
        level: PermissionLevel,
    ) -> anyhow::Result<bool>;
}

/// Grants nothing. Organizer-only setups use this: the engine's
/// organizer fast-path still applies before the collaborator is asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authorizer for DenyAll {
    fn has_permission(&self, _: &str, _: &str, _: PermissionLevel) -> anyhow::Result<bool> {
        Ok(false)
    }
}
