// Domain Layer - Pure business logic and entities

pub mod diff;
pub mod error;
pub mod live_set;
pub mod notification;

// Re-exports
pub use diff::{diff, SnapshotDelta};
pub use error::DomainError;
pub use live_set::LiveSet;
pub use notification::{Notification, NotificationId, RawNotification};
