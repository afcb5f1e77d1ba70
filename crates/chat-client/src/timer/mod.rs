//! Cancelable timers
//!
//! Timers are the only deferred work in the client. A firing is delivered
//! back to the event loop as a [`TimerFired`] event; handlers compare its
//! handle against the one they currently hold, so a firing that was already
//! queued when its timer got cancelled is recognised as stale.

mod manual;
mod tokio_scheduler;

pub use manual::ManualScheduler;
pub use tokio_scheduler::TokioScheduler;

use std::fmt;
use std::time::Duration;

/// Identity of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// What a timer is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    /// Local inactivity timeout ending the "typing" state
    TypingIdle,
    /// Remote "is typing" notice expiry
    TypingExpiry { sender: String },
}

/// A timer that reached its deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerFired {
    pub handle: TimerHandle,
    pub kind: TimerKind,
}

/// Timer capability owned by the typing debouncer
pub trait Scheduler {
    /// Start a timer
    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle;

    /// Cancel a timer. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}
