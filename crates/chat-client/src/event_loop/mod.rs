//! Single consumer event loop
//!
//! Transport and timer tasks only post events. All session state is touched
//! here, one event at a time.

use crate::events::{ClientEvent, EventReceiver};
use crate::render::Renderer;
use crate::session::ChatClient;
use crate::timer::Scheduler;
use crate::transport::Transport;

/// Drain events until shutdown or until every sender is gone
///
/// Returns the number of events handled.
pub async fn run<T, R, S>(client: &mut ChatClient<T, R, S>, mut events: EventReceiver) -> u64
where
    T: Transport,
    R: Renderer,
    S: Scheduler,
{
    let mut handled = 0;

    while let Some(event) = events.recv().await {
        handled += 1;
        tracing::trace!(event = event_name(&event), "Handling event");

        if client.handle_event(event).is_break() {
            tracing::debug!(handled, "Event loop stopped");
            return handled;
        }
    }

    // Every sender dropped: leave cleanly
    client.disconnect();
    tracing::debug!(handled, "Event channel closed");
    handled
}

fn event_name(event: &ClientEvent) -> &'static str {
    match event {
        ClientEvent::Ui(_) => "ui",
        ClientEvent::Transport(_) => "transport",
        ClientEvent::Timer(_) => "timer",
        ClientEvent::Shutdown => "shutdown",
    }
}
