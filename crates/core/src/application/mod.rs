// Application Layer - Use Cases and Business Logic

pub mod listener;

// Re-exports
pub use listener::{
    shutdown_channel, Listener, ListenerConfig, NoticeEvent, NoticeView, ShutdownSender,
    ShutdownToken,
};
