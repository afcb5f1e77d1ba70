//! Controllable clock for tests and replay

use super::{Scheduler, TimerFired, TimerHandle, TimerKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct Pending {
    deadline: Duration,
    handle: TimerHandle,
    kind: TimerKind,
}

#[derive(Debug, Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

/// Scheduler driven by explicit [`ManualScheduler::advance`] calls
///
/// Clones share one clock, so a test can keep a clone while the client owns
/// the other.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ClockState>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the scheduler was created
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of timers waiting to fire
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.state.lock().pending.iter().any(|p| p.handle == handle)
    }

    /// Move the clock forward and collect every timer that came due
    ///
    /// Firings are returned in deadline order; timers with equal deadlines
    /// fire in the order they were scheduled.
    pub fn advance(&self, by: Duration) -> Vec<TimerFired> {
        let mut state = self.state.lock();
        state.now += by;
        let now = state.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            state.pending.drain(..).partition(|p| p.deadline <= now);
        state.pending = waiting;

        due.sort_by_key(|p| (p.deadline, p.handle));
        due.into_iter()
            .map(|p| TimerFired {
                handle: p.handle,
                kind: p.kind,
            })
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle {
        let mut state = self.state.lock();
        let handle = TimerHandle::new(state.next_id);
        state.next_id += 1;

        let deadline = state.now + delay;
        state.pending.push(Pending {
            deadline,
            handle,
            kind,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.state.lock().pending.retain(|p| p.handle != handle);
    }
}
