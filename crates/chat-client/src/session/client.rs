//! Chat session state machine
//!
//! `ChatClient` owns the session, the presence set and the typing debouncer,
//! and is the only place they change. It reacts to one [`ClientEvent`] at a
//! time: UI input, transport events and timer firings.

use super::{Session, SessionStatus};
use crate::events::{ClientEvent, UiEvent};
use crate::protocol::{Channel, Destination};
use crate::render::Renderer;
use crate::router::{InboundMessage, MessageRouter, RouteContext, RouteOutcome};
use crate::timer::{Scheduler, TimerFired};
use crate::transport::{ConnectOptions, Transport, TransportEvent};
use crate::typing::TypingDebouncer;
use chat_common::{ClientConfig, ClientError, ClientResult, TypingConfig};
use chat_core::{ChatEnvelope, DomainError, EnvelopeBuilder, MessageMode, PresenceSet};
use std::ops::ControlFlow;

/// Status label shown when the broker cannot be reached
pub const CONNECTION_FAILED_LABEL: &str = "Connection failed";
pub const CONNECTION_FAILED_MESSAGE: &str =
    "Connection failed. Please check if the server is running and try again.";
pub const CONNECTION_LOST_MESSAGE: &str = "Connection to the chat server was lost.";
pub const DISCONNECTED_MESSAGE: &str = "You have been disconnected from the chat.";

/// Client side of one chat session
pub struct ChatClient<T: Transport, R: Renderer, S: Scheduler> {
    transport: T,
    renderer: R,
    typing: TypingDebouncer<S>,
    presence: PresenceSet,
    session: Session,
    options: ConnectOptions,
    mode: MessageMode,
    recipient: Option<String>,
}

impl<T: Transport, R: Renderer, S: Scheduler> ChatClient<T, R, S> {
    pub fn new(
        transport: T,
        renderer: R,
        scheduler: S,
        options: ConnectOptions,
        typing: TypingConfig,
    ) -> Self {
        Self {
            transport,
            renderer,
            typing: TypingDebouncer::new(scheduler, typing),
            presence: PresenceSet::new(),
            session: Session::new(),
            options,
            mode: MessageMode::Public,
            recipient: None,
        }
    }

    /// Build a client from loaded configuration
    pub fn from_config(transport: T, renderer: R, scheduler: S, config: &ClientConfig) -> Self {
        Self::new(
            transport,
            renderer,
            scheduler,
            ConnectOptions::from_config(&config.broker),
            config.typing,
        )
    }

    // === Event handling ===

    /// Handle one event to completion
    pub fn handle_event(&mut self, event: ClientEvent) -> ControlFlow<()> {
        match event {
            ClientEvent::Ui(event) => self.handle_ui(event),
            ClientEvent::Transport(event) => self.handle_transport(event),
            ClientEvent::Timer(fired) => self.handle_timer(&fired),
            ClientEvent::Shutdown => {
                self.disconnect();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Handle user input. Errors are reported to the user, never propagated.
    pub fn handle_ui(&mut self, event: UiEvent) {
        let result = match event {
            UiEvent::ConnectRequested(username) => self.connect(&username),
            UiEvent::DisconnectRequested => {
                self.disconnect();
                Ok(())
            }
            UiEvent::SendRequested {
                content,
                mode,
                recipient,
            } => self.send_message(&content, mode, recipient.as_deref()),
            UiEvent::Submit(content) => self.submit(&content),
            UiEvent::Keystroke => {
                self.on_keystroke();
                Ok(())
            }
            UiEvent::InputCleared => {
                self.on_input_cleared();
                Ok(())
            }
            UiEvent::ModeChanged(mode) => {
                self.set_mode(mode);
                Ok(())
            }
            UiEvent::SelectUser(user) => self.select_user(&user),
        };

        if let Err(e) = result {
            self.report(&e);
        }
    }

    /// Handle a transport event. Events from a superseded attempt are dropped.
    pub fn handle_transport(&mut self, event: TransportEvent) {
        let connection = event.connection();
        if !self.session.is_current(connection) {
            tracing::debug!(connection = %connection, "Dropping event from stale connection");
            return;
        }

        match event {
            TransportEvent::Connected { .. } => self.on_connected(),
            TransportEvent::ConnectFailed { reason, .. } => self.on_connect_failed(&reason),
            TransportEvent::Message { channel, body, .. } => self.on_transport_message(channel, &body),
            TransportEvent::Closed { reason, .. } => self.connection_lost(&reason),
        }
    }

    /// Apply a timer firing
    pub fn handle_timer(&mut self, fired: &TimerFired) {
        self.typing.on_timer(fired, &mut self.renderer);
    }

    fn report(&mut self, error: &ClientError) {
        if error.is_user_facing() {
            tracing::debug!(code = error.error_code(), error = %error, "Rejected user input");
            self.renderer.render_alert(&error.to_string());
        } else {
            // Connection errors were already surfaced when the session was torn down
            tracing::warn!(code = error.error_code(), error = %error, "Request failed");
        }
    }

    // === Connection lifecycle ===

    /// Start connecting as `username`
    ///
    /// Returns immediately; the outcome arrives later as a transport event.
    ///
    /// # Errors
    /// `Validation` for a blank username, `AlreadyConnected` while a session
    /// is connecting or connected.
    pub fn connect(&mut self, username: &str) -> ClientResult<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::InvalidUsername.into());
        }
        if self.session.is_active() {
            return Err(ClientError::AlreadyConnected);
        }

        let connection = self.transport.connect(&self.options);
        self.session.begin(username, connection);

        tracing::info!(
            session_id = ?self.session.session_id(),
            connection = %connection,
            username = %username,
            url = %self.options.url,
            "Connecting"
        );

        self.set_status(SessionStatus::Connecting, SessionStatus::Connecting.label());
        Ok(())
    }

    /// Leave the chat
    ///
    /// Returns `false` when there was nothing to disconnect.
    pub fn disconnect(&mut self) -> bool {
        if !self.session.is_active() {
            return false;
        }

        tracing::info!(session_id = ?self.session.session_id(), "Disconnecting");
        self.teardown();
        self.set_status(SessionStatus::Disconnected, SessionStatus::Disconnected.label());
        self.renderer.render_presence_list(&self.presence, None);
        self.renderer.render_system_message(DISCONNECTED_MESSAGE);
        true
    }

    fn on_connected(&mut self) {
        if self.session.status() != SessionStatus::Connecting {
            tracing::debug!(status = %self.session.status(), "Ignoring duplicate connected event");
            return;
        }

        self.session.mark_connected();
        tracing::info!(session_id = ?self.session.session_id(), "Connected");
        self.set_status(SessionStatus::Connected, SessionStatus::Connected.label());

        for channel in Channel::ALL {
            match self.transport.subscribe(channel) {
                Ok(subscription) => {
                    tracing::debug!(channel = %channel, subscription = %subscription, "Subscribed");
                }
                Err(e) => {
                    self.connection_lost(&e.to_string());
                    return;
                }
            }
        }

        let Some(username) = self.session.username() else {
            return;
        };
        let join = EnvelopeBuilder::build_join(username);
        if let Err(e) = self.send_envelope(Destination::AddUser, &join) {
            tracing::debug!(error = %e, "JOIN not sent");
        }
    }

    fn on_connect_failed(&mut self, reason: &str) {
        tracing::warn!(
            session_id = ?self.session.session_id(),
            reason = %reason,
            "Connection attempt failed"
        );
        self.teardown();
        self.set_status(SessionStatus::Disconnected, CONNECTION_FAILED_LABEL);
        self.renderer.render_system_message(CONNECTION_FAILED_MESSAGE);
    }

    /// Drop a connection that failed underneath us. No retry.
    fn connection_lost(&mut self, reason: &str) {
        if !self.session.is_active() {
            return;
        }

        tracing::warn!(
            session_id = ?self.session.session_id(),
            reason = %reason,
            "Connection lost"
        );
        self.teardown();
        self.set_status(SessionStatus::Disconnected, SessionStatus::Disconnected.label());
        self.renderer.render_presence_list(&self.presence, None);
        self.renderer.render_system_message(CONNECTION_LOST_MESSAGE);
    }

    fn teardown(&mut self) {
        self.transport.disconnect();
        self.presence.clear();
        self.typing.reset(&mut self.renderer);
        self.session.reset();
    }

    fn set_status(&mut self, status: SessionStatus, label: &str) {
        self.renderer.render_connection_status(status, label);
    }

    // === Outbound ===

    /// Send a chat message with an explicit mode and recipient
    ///
    /// A private send is echoed locally under the local username.
    ///
    /// # Errors
    /// `NotConnected`, validation errors from the envelope builder, or
    /// `Connection` if the transport refused the send.
    pub fn send_message(
        &mut self,
        content: &str,
        mode: MessageMode,
        recipient: Option<&str>,
    ) -> ClientResult<()> {
        let username = self.sending_username()?;

        match mode {
            MessageMode::Public => {
                let envelope = EnvelopeBuilder::build_chat(&username, content)?;
                self.send_envelope(Destination::SendMessage, &envelope)?;
            }
            MessageMode::Private => {
                let envelope =
                    EnvelopeBuilder::build_private(recipient.unwrap_or_default(), content, &username)?;
                self.send_envelope(Destination::SendPrivate, &envelope)?;

                // The envelope's sender is the recipient
                let echo =
                    EnvelopeBuilder::local_private_echo(&username, &envelope.sender, &envelope.content);
                self.renderer.render_message(&echo, true);
            }
        }

        self.typing.clear_local_typing();
        Ok(())
    }

    /// Send using the currently selected mode and recipient
    ///
    /// # Errors
    /// See [`ChatClient::send_message`].
    pub fn submit(&mut self, content: &str) -> ClientResult<()> {
        let recipient = self.recipient.clone();
        self.send_message(content, self.mode, recipient.as_deref())
    }

    fn sending_username(&self) -> ClientResult<String> {
        match self.session.username() {
            Some(username) if self.session.can_send() => Ok(username.to_string()),
            _ => Err(ClientError::NotConnected),
        }
    }

    /// Serialize and send. A transport failure ends the session.
    fn send_envelope(&mut self, destination: Destination, envelope: &ChatEnvelope) -> ClientResult<()> {
        let body = envelope.to_json().map_err(ClientError::internal)?;

        tracing::debug!(
            destination = %destination,
            message_type = %envelope.message_type,
            "Sending envelope"
        );

        if let Err(e) = self.transport.send(destination, body) {
            self.connection_lost(&e.to_string());
            return Err(ClientError::connection(e));
        }
        Ok(())
    }

    // === Input state ===

    /// A key was pressed in the message input
    pub fn on_keystroke(&mut self) {
        if !self.session.can_send() {
            return;
        }
        if !self.typing.on_local_keystroke(self.mode) {
            return;
        }

        let Some(username) = self.session.username() else {
            return;
        };
        let notice = EnvelopeBuilder::build_typing(username);
        if let Err(e) = self.send_envelope(Destination::Typing, &notice) {
            tracing::debug!(error = %e, "Typing notice not sent");
        }
    }

    /// The message input was emptied
    pub fn on_input_cleared(&mut self) {
        self.typing.clear_local_typing();
    }

    /// Switch compose mode. Going public forgets the selected recipient.
    pub fn set_mode(&mut self, mode: MessageMode) {
        self.mode = mode;
        if mode == MessageMode::Public {
            self.recipient = None;
        }
    }

    /// Pick a private message recipient
    ///
    /// # Errors
    /// `Validation` for a blank name or the local user.
    pub fn select_user(&mut self, user: &str) -> ClientResult<()> {
        let user = user.trim();
        if user.is_empty() {
            return Err(DomainError::MissingRecipient.into());
        }
        if self.session.username() == Some(user) {
            return Err(DomainError::SelfTarget.into());
        }

        self.mode = MessageMode::Private;
        self.recipient = Some(user.to_string());
        Ok(())
    }

    // === Inbound ===

    fn on_transport_message(&mut self, channel: Channel, body: &str) {
        match InboundMessage::decode(channel, body) {
            Ok(inbound) => {
                self.route(&inbound);
            }
            Err(e) => {
                tracing::warn!(channel = %channel, error = %e, "Dropping malformed message");
            }
        }
    }

    /// Route one decoded message. A no-op unless connected.
    pub fn route(&mut self, inbound: &InboundMessage) -> Option<RouteOutcome> {
        if !self.session.is_connected() {
            tracing::debug!(channel = %inbound.channel, "Not connected, dropping message");
            return None;
        }

        let ctx = RouteContext {
            local_username: self.session.username(),
            presence: &mut self.presence,
            typing: &mut self.typing,
            renderer: &mut self.renderer,
        };
        Some(MessageRouter::route(ctx, inbound))
    }

    // === Accessors ===

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn presence(&self) -> &PresenceSet {
        &self.presence
    }

    #[must_use]
    pub fn mode(&self) -> MessageMode {
        self.mode
    }

    #[must_use]
    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    pub fn typing(&self) -> &TypingDebouncer<S> {
        &self.typing
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
