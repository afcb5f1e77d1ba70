//! # chat-client
//!
//! Real-time chat client speaking STOMP over WebSocket.
//!
//! The [`ChatClient`] session state machine reacts to UI input, transport
//! events and timer firings delivered through a single event loop. The
//! transport, the renderer and the timer capability are injected, so the
//! whole session can be driven deterministically in tests.

pub mod event_loop;
pub mod events;
pub mod input;
pub mod protocol;
pub mod render;
pub mod router;
pub mod session;
pub mod timer;
pub mod transport;
pub mod typing;


pub use events::{ClientEvent, UiEvent};
pub use render::{Renderer, TerminalRenderer};
pub use router::{InboundMessage, MessageRouter, RouteOutcome};
pub use session::{ChatClient, Session, SessionStatus};
pub use timer::{ManualScheduler, Scheduler, TimerFired, TimerHandle, TimerKind, TokioScheduler};
pub use transport::{
    ConnectOptions, ConnectionId, StompTransport, Transport, TransportError, TransportEvent,
};
pub use typing::TypingDebouncer;
