// Listener constants (no magic values)
use std::time::Duration;

/// Fixed delay between reconciliation cycles (1s)
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Delay after a termination request before spawning the replacement (1s)
pub const RESTART_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Buffered capacity of the change-feed broadcast channel.
/// Slow subscribers that fall further behind than this see Lagged errors.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
