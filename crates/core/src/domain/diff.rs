// Snapshot Differ - pure reconciliation step

use std::collections::HashSet;

use crate::domain::notification::{Notification, NotificationId};

/// Delta between the previously known id set and a fresh snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDelta {
    /// Snapshot items not previously known, in snapshot order
    pub added: Vec<Notification>,
    /// Previously known ids absent from the snapshot
    pub removed_ids: HashSet<NotificationId>,
}

impl SnapshotDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed_ids.is_empty()
    }
}

/// Compute additions and removals between `previous_ids` and `snapshot`.
///
/// Pure function: empty inputs yield empty outputs, no error conditions.
/// Duplicate ids within a snapshot violate the source contract; if they occur
/// anyway, the first occurrence wins and later duplicates are ignored. This is
/// an input-quality assumption, not validated.
pub fn diff(previous_ids: &HashSet<NotificationId>, snapshot: &[Notification]) -> SnapshotDelta {
    let mut seen = HashSet::with_capacity(snapshot.len());
    let mut added = Vec::new();

    for notice in snapshot {
        if !seen.insert(notice.id) {
            continue;
        }
        if !previous_ids.contains(&notice.id) {
            added.push(notice.clone());
        }
    }

    let removed_ids = previous_ids
        .iter()
        .copied()
        .filter(|id| !seen.contains(id))
        .collect();

    SnapshotDelta { added, removed_ids }
}
