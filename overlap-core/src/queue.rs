//! Slot queue — ordered, capacity-aware participant list for one time slot.
//!
//! Positions are dense and 1-based, implied by list order, so removal
//! re-densifies by construction (no string-keyed position maps, no gaps).
//! Waitlisting is derived: position > capacity means waitlisted. Position
//! assignment is strictly FIFO; re-adding after removal earns a new position.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotQueue {
    members: Vec<String>,
}

impl SlotQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.members.iter().any(|m| m == participant)
    }

    /// 1-based queue position, if present.
    pub fn position_of(&self, participant: &str) -> Option<usize> {
        self.members.iter().position(|m| m == participant).map(|i| i + 1)
    }

    /// Append at the tail unless already present. Returns true if the queue
    /// changed.
    pub fn add(&mut self, participant: &str) -> bool {
        if self.contains(participant) {
            return false;
        }
        self.members.push(participant.to_string());
        true
    }

    /// Remove if present; later entries shift down one position. Returns
    /// true if the queue changed.
    pub fn remove(&mut self, participant: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != participant);
        self.members.len() != before
    }

    /// Registered means position <= capacity; no capacity means everyone is
    /// registered.
    pub fn is_registered(&self, participant: &str, capacity: Option<u32>) -> bool {
        match (self.position_of(participant), capacity) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(pos), Some(cap)) => pos <= cap as usize,
        }
    }

    /// Participants in position order (position 1 first).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_fifo() {
        let mut q = SlotQueue::new();
        assert!(q.add("alice"));
        assert!(q.add("bob"));
        assert!(!q.add("alice"));
        assert_eq!(q.position_of("alice"), Some(1));
        assert_eq!(q.position_of("bob"), Some(2));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn remove_redensifies_positions() {
        let mut q = SlotQueue::new();
        q.add("a");
        q.add("b");
        q.add("c");
        assert!(q.remove("b"));
        assert_eq!(q.position_of("a"), Some(1));
        assert_eq!(q.position_of("c"), Some(2));
        assert!(!q.remove("b"));
    }

    #[test]
    fn readd_gets_a_new_position() {
        let mut q = SlotQueue::new();
        q.add("a");
        q.add("b");
        q.remove("a");
        q.add("a");
        assert_eq!(q.position_of("b"), Some(1));
        assert_eq!(q.position_of("a"), Some(2));
    }

    #[test]
    fn capacity_splits_registered_from_waitlisted() {
        let mut q = SlotQueue::new();
        q.add("a");
        q.add("b");
        assert!(q.is_registered("a", Some(1)));
        assert!(!q.is_registered("b", Some(1)));
        assert!(q.is_registered("b", None));
        assert!(!q.is_registered("absent", Some(1)));
    }

    #[test]
    fn waitlist_promotes_when_earlier_entry_leaves() {
        let mut q = SlotQueue::new();
        q.add("a");
        q.add("b");
        assert!(!q.is_registered("b", Some(1)));
        q.remove("a");
        assert!(q.is_registered("b", Some(1)));
    }

    #[test]
    fn positions_stay_dense_under_churn() {
        let mut q = SlotQueue::new();
        for name in ["a", "b", "c", "d", "e"] {
            q.add(name);
        }
        q.remove("c");
        q.remove("a");
        q.add("f");

        let positions: Vec<usize> =
            q.iter().filter_map(|m| q.position_of(m)).collect();
        assert_eq!(positions, (1..=q.len()).collect::<Vec<_>>());
    }

    #[test]
    fn serializes_as_an_ordered_array() {
        let mut q = SlotQueue::new();
        q.add("a");
        q.add("b");
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: SlotQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
