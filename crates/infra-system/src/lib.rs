// noticed Infrastructure - System Adapters
// Implements: ProcessControl, NotificationSource

pub mod json_file_source;
pub mod process_control_impl;

pub use json_file_source::JsonFileSource;
pub use process_control_impl::SystemProcessControl;
