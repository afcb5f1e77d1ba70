//! Test helpers for integration tests
//!
//! Provides a scripted transport and a recording renderer that share their
//! state with the test, plus a harness that wires them into a `ChatClient`
//! driven by a manual clock.

use std::sync::Arc;
use std::time::Duration;

use chat_client::protocol::{Channel, Destination};
use chat_client::transport::SubscriptionId;
use chat_client::{
    ChatClient, ClientEvent, ConnectOptions, ConnectionId, ManualScheduler, Renderer,
    SessionStatus, Transport, TransportError, TransportEvent, UiEvent,
};
use chat_common::ClientConfig;
use chat_core::{ChatEnvelope, PresenceSet};
use parking_lot::Mutex;

// ============================================================================
// Transport
// ============================================================================

#[derive(Debug, Default)]
struct TransportState {
    next_id: u64,
    connected: bool,
    fail_sends: bool,
    connects: Vec<ConnectOptions>,
    subscriptions: Vec<Channel>,
    sent: Vec<(Destination, String)>,
    disconnects: usize,
}

/// Transport that records every call
///
/// Clones share state: keep one in the test and hand the other to the client.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail
    pub fn fail_sends(&self, fail: bool) {
        self.state.lock().fail_sends = fail;
    }

    pub fn connects(&self) -> Vec<ConnectOptions> {
        self.state.lock().connects.clone()
    }

    pub fn subscriptions(&self) -> Vec<Channel> {
        self.state.lock().subscriptions.clone()
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().disconnects
    }

    pub fn sent(&self) -> Vec<(Destination, String)> {
        self.state.lock().sent.clone()
    }

    /// Decoded envelopes sent to one destination
    pub fn sent_to(&self, destination: Destination) -> Vec<ChatEnvelope> {
        self.state
            .lock()
            .sent
            .iter()
            .filter(|(dest, _)| *dest == destination)
            .map(|(_, body)| ChatEnvelope::from_json(body).expect("client sent invalid JSON"))
            .collect()
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, options: &ConnectOptions) -> ConnectionId {
        let mut state = self.state.lock();
        let id = ConnectionId::new(state.next_id);
        state.next_id += 1;
        state.connected = true;
        state.connects.push(options.clone());
        id
    }

    fn subscribe(&mut self, channel: Channel) -> Result<SubscriptionId, TransportError> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        state.subscriptions.push(channel);
        Ok(SubscriptionId::from_index(state.subscriptions.len() as u64 - 1))
    }

    fn send(&mut self, destination: Destination, body: String) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        if state.fail_sends {
            return Err(TransportError::ChannelClosed);
        }
        state.sent.push((destination, body));
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut state = self.state.lock();
        if state.connected {
            state.disconnects += 1;
        }
        state.connected = false;
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// One rendering call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Message { envelope: ChatEnvelope, is_private: bool },
    Presence { users: Vec<String>, local: Option<String> },
    Status { status: SessionStatus, label: String },
    Typing(Option<String>),
    System(String),
    UserCount(String),
    Alert(String),
}

/// Renderer that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<Rendered>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().clone()
    }

    pub fn last(&self) -> Option<Rendered> {
        self.events.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn messages(&self) -> Vec<(ChatEnvelope, bool)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Rendered::Message { envelope, is_private } => Some((envelope.clone(), *is_private)),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<(SessionStatus, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Rendered::Status { status, label } => Some((*status, label.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn system_messages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Rendered::System(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Rendered::Alert(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Text of the most recent typing indicator call; `None` when cleared
    pub fn typing_indicator(&self) -> Option<String> {
        self.events
            .lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                Rendered::Typing(text) => Some(text.clone()),
                _ => None,
            })
            .flatten()
    }

    fn push(&self, event: Rendered) {
        self.events.lock().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn render_message(&mut self, envelope: &ChatEnvelope, is_private: bool) {
        self.push(Rendered::Message {
            envelope: envelope.clone(),
            is_private,
        });
    }

    fn render_presence_list(&mut self, users: &PresenceSet, local_username: Option<&str>) {
        self.push(Rendered::Presence {
            users: users.iter().map(str::to_string).collect(),
            local: local_username.map(str::to_string),
        });
    }

    fn render_connection_status(&mut self, status: SessionStatus, label: &str) {
        self.push(Rendered::Status {
            status,
            label: label.to_string(),
        });
    }

    fn render_typing_indicator(&mut self, text: Option<&str>) {
        self.push(Rendered::Typing(text.map(str::to_string)));
    }

    fn render_system_message(&mut self, text: &str) {
        self.push(Rendered::System(text.to_string()));
    }

    fn render_user_count(&mut self, text: &str) {
        self.push(Rendered::UserCount(text.to_string()));
    }

    fn render_alert(&mut self, text: &str) {
        self.push(Rendered::Alert(text.to_string()));
    }
}

// ============================================================================
// Harness
// ============================================================================

pub type TestClient = ChatClient<MockTransport, RecordingRenderer, ManualScheduler>;

/// A client plus handles on its collaborators
pub struct Harness {
    pub client: TestClient,
    pub transport: MockTransport,
    pub renderer: RecordingRenderer,
    pub clock: ManualScheduler,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Self {
        let transport = MockTransport::new();
        let renderer = RecordingRenderer::new();
        let clock = ManualScheduler::new();
        let client = ChatClient::from_config(transport.clone(), renderer.clone(), clock.clone(), config);

        Self {
            client,
            transport,
            renderer,
            clock,
        }
    }

    /// Connect and complete the handshake
    pub fn connect_as(&mut self, username: &str) -> ConnectionId {
        self.ui(UiEvent::ConnectRequested(username.to_string()));
        let connection = self.current_connection();
        self.transport_event(TransportEvent::Connected { connection });
        connection
    }

    pub fn current_connection(&self) -> ConnectionId {
        self.client
            .session()
            .connection()
            .expect("no connection attempt in progress")
    }

    pub fn ui(&mut self, event: UiEvent) {
        let _ = self.client.handle_event(ClientEvent::Ui(event));
    }

    pub fn transport_event(&mut self, event: TransportEvent) {
        let _ = self.client.handle_event(ClientEvent::Transport(event));
    }

    /// Deliver a message body on a channel of the current connection
    pub fn deliver(&mut self, channel: Channel, body: &str) {
        let connection = self.current_connection();
        self.transport_event(TransportEvent::Message {
            connection,
            channel,
            body: body.to_string(),
        });
    }

    /// Advance the clock and feed every firing through the event loop
    pub fn advance(&mut self, by: Duration) -> usize {
        let fired = self.clock.advance(by);
        let count = fired.len();
        for timer in fired {
            let _ = self.client.handle_event(ClientEvent::Timer(timer));
        }
        count
    }
}
