//! STOMP over WebSocket
//!
//! Each connection attempt runs on its own task. The task owns the socket,
//! performs the CONNECT handshake, writes queued frames and turns inbound
//! MESSAGE frames into [`TransportEvent`]s posted on the event loop channel.

use super::{ConnectOptions, ConnectionId, SubscriptionId, Transport, TransportError, TransportEvent};
use crate::events::{ClientEvent, EventSender};
use crate::protocol::{Channel, Destination, StompCommand, StompFrame};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SocketSink = SplitSink<Socket, Message>;

/// Work queued for the connection task
#[derive(Debug)]
enum Outgoing {
    Subscribe { id: SubscriptionId, channel: Channel },
    Send { destination: Destination, body: String },
}

struct ActiveConnection {
    id: ConnectionId,
    commands: mpsc::UnboundedSender<Outgoing>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// STOMP 1.2 client over a WebSocket text channel
///
/// Must be used from within a tokio runtime.
pub struct StompTransport {
    events: EventSender,
    next_connection: u64,
    next_subscription: u64,
    active: Option<ActiveConnection>,
}

impl StompTransport {
    #[must_use]
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            next_connection: 0,
            next_subscription: 0,
            active: None,
        }
    }

    /// Id of the current connection attempt, if any
    #[must_use]
    pub fn current(&self) -> Option<ConnectionId> {
        self.active.as_ref().map(|active| active.id)
    }

    fn queue(&self, outgoing: Outgoing) -> Result<(), TransportError> {
        let active = self.active.as_ref().ok_or(TransportError::NotConnected)?;
        active
            .commands
            .send(outgoing)
            .map_err(|_| TransportError::ChannelClosed)
    }
}

impl Transport for StompTransport {
    fn connect(&mut self, options: &ConnectOptions) -> ConnectionId {
        self.disconnect();

        let id = ConnectionId::new(self.next_connection);
        self.next_connection += 1;

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(run_connection(
            id,
            options.clone(),
            self.events.clone(),
            commands_rx,
            shutdown_rx,
        ));

        tracing::debug!(connection = %id, url = %options.url, "Connection task started");

        self.active = Some(ActiveConnection {
            id,
            commands: commands_tx,
            shutdown: shutdown_tx,
            task,
        });
        id
    }

    fn subscribe(&mut self, channel: Channel) -> Result<SubscriptionId, TransportError> {
        let id = SubscriptionId::from_index(self.next_subscription);
        self.queue(Outgoing::Subscribe {
            id: id.clone(),
            channel,
        })?;
        self.next_subscription += 1;
        Ok(id)
    }

    fn send(&mut self, destination: Destination, body: String) -> Result<(), TransportError> {
        self.queue(Outgoing::Send { destination, body })
    }

    fn disconnect(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::debug!(connection = %active.id, "Requesting connection shutdown");
            // The task may already have ended on its own
            let _ = active.shutdown.send(());
        }
    }
}

impl Drop for StompTransport {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.task.abort();
        }
    }
}

fn post(events: &EventSender, event: TransportEvent) -> bool {
    events.send(ClientEvent::Transport(event)).is_ok()
}

async fn run_connection(
    id: ConnectionId,
    options: ConnectOptions,
    events: EventSender,
    mut commands: mpsc::UnboundedReceiver<Outgoing>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let attempt = tokio::time::timeout(options.connect_timeout, handshake(&options));

    let socket = tokio::select! {
        _ = &mut shutdown => {
            tracing::debug!(connection = %id, "Shutdown requested during handshake");
            return;
        }
        result = attempt => match result {
            Ok(Ok(socket)) => socket,
            Ok(Err(e)) => {
                tracing::warn!(connection = %id, error = %e, "Broker handshake failed");
                post(&events, TransportEvent::ConnectFailed { connection: id, reason: e.to_string() });
                return;
            }
            Err(_) => {
                tracing::warn!(connection = %id, "Broker handshake timed out");
                post(&events, TransportEvent::ConnectFailed {
                    connection: id,
                    reason: TransportError::Timeout.to_string(),
                });
                return;
            }
        }
    };

    tracing::info!(connection = %id, url = %options.url, "Connected to broker");
    if !post(&events, TransportEvent::Connected { connection: id }) {
        return;
    }

    let (mut sink, mut stream) = socket.split();
    let mut subscriptions: HashMap<String, Channel> = HashMap::new();

    let reason = loop {
        tokio::select! {
            _ = &mut shutdown => {
                close_gracefully(id, &mut sink).await;
                return;
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    // Transport handle dropped
                    close_gracefully(id, &mut sink).await;
                    return;
                };
                let frame = match command {
                    Outgoing::Subscribe { id: sub_id, channel } => {
                        tracing::debug!(connection = %id, subscription = %sub_id, channel = %channel, "Subscribing");
                        subscriptions.insert(sub_id.as_str().to_string(), channel);
                        StompFrame::subscribe(sub_id.as_str(), channel.path())
                    }
                    Outgoing::Send { destination, body } => {
                        tracing::trace!(connection = %id, destination = %destination, "Sending frame");
                        StompFrame::send(destination.path(), body)
                    }
                };
                if let Err(e) = sink.send(Message::Text(frame.encode())).await {
                    break format!("send failed: {e}");
                }
            }
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reason) = dispatch_frames(id, &text, &subscriptions, &events) {
                        break reason;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    break frame.map_or_else(
                        || "connection closed by broker".to_string(),
                        |f| format!("connection closed by broker: {}", f.reason),
                    );
                }
                Some(Ok(_)) => {
                    // Ping/pong are answered by tungstenite, binary is not used
                }
                Some(Err(e)) => break format!("websocket error: {e}"),
                None => break "connection closed by broker".to_string(),
            }
        }
    };

    tracing::warn!(connection = %id, reason = %reason, "Broker connection lost");
    post(&events, TransportEvent::Closed { connection: id, reason });
}

/// Open the socket and exchange CONNECT / CONNECTED
async fn handshake(options: &ConnectOptions) -> Result<Socket, TransportError> {
    let (mut socket, _response) = connect_async(options.url.as_str()).await?;

    socket
        .send(Message::Text(StompFrame::connect(&options.host).encode()))
        .await?;

    while let Some(message) = socket.next().await {
        let text = match message? {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        for frame in StompFrame::decode_all(&text)? {
            match frame.command {
                StompCommand::Connected => {
                    tracing::debug!(
                        version = frame.get_header("version").unwrap_or("1.0"),
                        "STOMP session established"
                    );
                    return Ok(socket);
                }
                StompCommand::Error => return Err(TransportError::Rejected(frame.error_message())),
                other => tracing::debug!(command = %other, "Ignoring frame before CONNECTED"),
            }
        }
    }

    Err(TransportError::ChannelClosed)
}

/// Handle one inbound text message. Returns a reason when the connection must end.
fn dispatch_frames(
    id: ConnectionId,
    text: &str,
    subscriptions: &HashMap<String, Channel>,
    events: &EventSender,
) -> Option<String> {
    let frames = match StompFrame::decode_all(text) {
        Ok(frames) => frames,
        Err(e) => {
            tracing::warn!(connection = %id, error = %e, "Dropping undecodable frame");
            return None;
        }
    };

    for frame in frames {
        match frame.command {
            StompCommand::Message => {
                let channel = frame
                    .get_header("subscription")
                    .and_then(|sub| subscriptions.get(sub).copied())
                    .or_else(|| frame.get_header("destination").and_then(Channel::parse));

                let Some(channel) = channel else {
                    tracing::warn!(
                        connection = %id,
                        destination = frame.get_header("destination").unwrap_or(""),
                        "Message for unknown subscription"
                    );
                    continue;
                };

                let event = TransportEvent::Message {
                    connection: id,
                    channel,
                    body: frame.body,
                };
                if !post(events, event) {
                    return Some("event loop closed".to_string());
                }
            }
            StompCommand::Error => return Some(frame.error_message()),
            StompCommand::Receipt => {
                tracing::trace!(connection = %id, receipt = frame.get_header("receipt-id").unwrap_or(""), "Receipt");
            }
            other => tracing::debug!(connection = %id, command = %other, "Ignoring unexpected frame"),
        }
    }
    None
}

async fn close_gracefully(id: ConnectionId, sink: &mut SocketSink) {
    tracing::debug!(connection = %id, "Closing broker connection");
    let _ = sink
        .send(Message::Text(StompFrame::disconnect().encode()))
        .await;
    let _ = sink.close().await;
}
