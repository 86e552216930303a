// Port Layer - Interfaces for external dependencies

pub mod notification_source;
pub mod process_control;

// Re-exports
pub use notification_source::{NotificationSource, SourceError};
pub use process_control::{ProcessControl, ProcessError, ProcessHandle};
