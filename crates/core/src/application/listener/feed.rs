// Change feed for the live notification set
//
// Consumers never observe torn state: each add/remove is published as one
// event together with a fresh copy of the ordered live set, so a reader
// either sees the mutation completely or not at all.

use tokio::sync::{broadcast, watch};

use crate::domain::{Notification, NotificationId};

use super::constants::EVENT_CHANNEL_CAPACITY;

/// One atomic mutation of the live set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeEvent {
    Added(Notification),
    Removed(NotificationId),
}

/// Publisher side, owned by the listener loop
pub(crate) struct NoticeFeed {
    events: broadcast::Sender<NoticeEvent>,
    snapshot: watch::Sender<Vec<Notification>>,
}

impl NoticeFeed {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshot, _) = watch::channel(Vec::new());
        Self { events, snapshot }
    }

    /// Publish one mutation: snapshot first, then the event.
    /// Send errors just mean nobody is listening.
    pub(crate) fn publish(&self, event: NoticeEvent, entries: &[Notification]) {
        let _ = self.snapshot.send(entries.to_vec());
        let _ = self.events.send(event);
    }

    pub(crate) fn view(&self) -> NoticeView {
        NoticeView {
            events: self.events.clone(),
            snapshot: self.snapshot.subscribe(),
        }
    }
}

/// Read-only, order-preserving, change-notifying view of the live set.
/// Cheap to clone; safe to read from other tasks while the loop mutates.
#[derive(Clone)]
pub struct NoticeView {
    events: broadcast::Sender<NoticeEvent>,
    snapshot: watch::Receiver<Vec<Notification>>,
}

impl NoticeView {
    /// Current live set, in insertion order
    pub fn current(&self) -> Vec<Notification> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to the change feed. Events published before the call are
    /// not replayed; use `current()` for the starting state.
    pub fn subscribe(&self) -> broadcast::Receiver<NoticeEvent> {
        self.events.subscribe()
    }
}
