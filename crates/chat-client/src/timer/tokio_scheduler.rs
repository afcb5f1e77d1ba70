//! Timers backed by the tokio runtime

use super::{Scheduler, TimerFired, TimerHandle, TimerKind};
use crate::events::{ClientEvent, EventSender};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawns one sleeping task per timer and posts the firing onto the event loop
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    events: EventSender,
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    /// Number of timers that have not fired or been cancelled yet
    #[must_use]
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }

    fn prune(&mut self) {
        self.tasks.retain(|_, task| !task.is_finished());
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle {
        self.prune();

        let handle = TimerHandle::new(self.next_id);
        self.next_id += 1;

        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if events
                .send(ClientEvent::Timer(TimerFired { handle, kind }))
                .is_err()
            {
                tracing::trace!(%handle, "Event loop gone, dropping timer firing");
            }
        });

        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
