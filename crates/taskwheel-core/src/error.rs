//! The scheduler's error taxonomy.

use core::fmt;

/// Failure reasons a submission call can return.
///
/// All failures are local: the scheduler never panics or aborts on these
/// paths, and the caller decides whether to retry or drop the work. The
/// "not initialized" kind from the original taxonomy has no runtime
/// counterpart here — a [`crate::Scheduler`] cannot exist in a
/// constructed-but-unusable state (see its module docs) — so it does not
/// appear as a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// The target queue (interrupt ring, asap queue, or event queue) has no
    /// room for another item.
    QueueFull,
    /// Allocating an event wrapper from the event pool failed because the
    /// pool is exhausted.
    PoolExhausted,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => f.write_str("queue is full"),
            Self::PoolExhausted => f.write_str("event pool is exhausted"),
        }
    }
}

impl core::error::Error for SchedulerError {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_distinct() {
        assert_eq!(SchedulerError::QueueFull.to_string(), "queue is full");
        assert_eq!(
            SchedulerError::PoolExhausted.to_string(),
            "event pool is exhausted"
        );
    }
}
