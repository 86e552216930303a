// LiveSet - ordered, id-keyed view of currently-present notifications

use std::collections::HashSet;

use crate::domain::diff::SnapshotDelta;
use crate::domain::notification::{Notification, NotificationId};

/// Ordered collection of notifications keyed by id.
///
/// Insertion order is preserved for additions and ids are unique. After every
/// reconciliation cycle the id set equals the snapshot's id set: no stale
/// entries, no missing entries.
#[derive(Debug, Default, Clone)]
pub struct LiveSet {
    entries: Vec<Notification>,
    ids: HashSet<NotificationId>,
}

impl LiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current id set, used as the `previous_ids` input of the next diff
    pub fn ids(&self) -> HashSet<NotificationId> {
        self.ids.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.ids.contains(&id)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Append a notification, preserving insertion order.
    /// Returns false (and leaves the set unchanged) if the id is already present.
    pub fn insert(&mut self, notice: Notification) -> bool {
        if !self.ids.insert(notice.id) {
            return false;
        }
        self.entries.push(notice);
        true
    }

    /// Remove by id. Returns the removed notification, if present.
    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        if !self.ids.remove(&id) {
            return None;
        }
        let pos = self.entries.iter().position(|n| n.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// Apply a reconciliation delta: append additions in order, drop removals.
    pub fn apply(&mut self, delta: &SnapshotDelta) {
        for id in &delta.removed_ids {
            self.remove(*id);
        }
        for notice in &delta.added {
            self.insert(notice.clone());
        }
    }
}
