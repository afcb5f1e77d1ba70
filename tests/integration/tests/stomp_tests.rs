//! STOMP Transport Integration Tests
//!
//! Run a real `StompTransport` and `TokioScheduler` against the in-process
//! broker on a loopback port.
//!
//! Run with: cargo test -p integration-tests --test stomp_tests

use chat_client::events::{self, EventReceiver};
use chat_client::protocol::{Channel, StompCommand, TYPING_TOPIC, USER_COUNT_TOPIC};
use chat_client::session::{CONNECTION_FAILED_MESSAGE, CONNECTION_LOST_MESSAGE};
use chat_client::{ChatClient, ConnectOptions, SessionStatus, StompTransport, TokioScheduler};
use chat_common::{BrokerConfig, TypingConfig};
use chat_core::{ChatEnvelope, MessageType};
use integration_tests::*;

type StompClient = ChatClient<StompTransport, RecordingRenderer, TokioScheduler>;

fn client_for(broker: &TestBroker, typing: TypingConfig) -> (StompClient, EventReceiver, RecordingRenderer) {
    let (tx, rx) = events::channel();
    let renderer = RecordingRenderer::new();
    let options = ConnectOptions::from_config(&BrokerConfig {
        url: broker.url(),
        host: "localhost".to_string(),
        connect_timeout_ms: 2_000,
    });

    let client = ChatClient::new(
        StompTransport::new(tx.clone()),
        renderer.clone(),
        TokioScheduler::new(tx),
        options,
        typing,
    );
    (client, rx, renderer)
}

/// Connect as `username` and wait until the broker echoed our JOIN
async fn joined(broker: &TestBroker, username: &str) -> (StompClient, EventReceiver, RecordingRenderer) {
    let (mut client, mut rx, renderer) = client_for(broker, TypingConfig::default());
    client.connect(username).expect("connect request rejected");

    let name = username.to_string();
    pump_until(&mut client, &mut rx, |c| c.presence().contains(&name))
        .await
        .expect("JOIN never came back");
    (client, rx, renderer)
}

// ============================================================================
// Handshake Tests
// ============================================================================

#[tokio::test]
async fn test_connect_subscribes_and_joins() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let username = unique_username("alice");
    let (client, _rx, renderer) = joined(&broker, &username).await;

    assert_eq!(client.status(), SessionStatus::Connected);

    let connects = broker.received_commands(StompCommand::Connect);
    assert_eq!(connects.len(), 1);
    assert_eq!(connects[0].get_header("host"), Some("localhost"));
    assert_eq!(connects[0].get_header("accept-version"), Some("1.2,1.1,1.0"));

    let destinations: Vec<String> = broker
        .received_commands(StompCommand::Subscribe)
        .iter()
        .filter_map(|frame| frame.get_header("destination").map(str::to_string))
        .collect();
    let expected: Vec<String> = Channel::ALL.iter().map(|c| c.path().to_string()).collect();
    assert_eq!(destinations, expected);

    let sends = broker.received_commands(StompCommand::Send);
    assert_eq!(sends[0].get_header("destination"), Some("/app/chat.addUser"));
    let join = ChatEnvelope::from_json(&sends[0].body).expect("JOIN body is JSON");
    assert_eq!(join.sender, username);
    assert_eq!(join.message_type, MessageType::Join);

    assert!(renderer
        .statuses()
        .contains(&(SessionStatus::Connected, "Connected".to_string())));
}

#[tokio::test]
async fn test_rejected_connect_reports_failure() {
    let broker = TestBroker::start_with(BrokerMode::Reject("Access denied".to_string()))
        .await
        .expect("Failed to start broker");
    let (mut client, mut rx, renderer) = client_for(&broker, TypingConfig::default());

    client.connect("alice").expect("connect request rejected");
    pump_until(&mut client, &mut rx, |c| c.status() == SessionStatus::Disconnected)
        .await
        .unwrap();

    assert_eq!(
        renderer.system_messages(),
        vec![CONNECTION_FAILED_MESSAGE.to_string()]
    );
    assert!(broker.received_commands(StompCommand::Subscribe).is_empty());
}

// ============================================================================
// Messaging Tests
// ============================================================================

#[tokio::test]
async fn test_public_message_round_trip() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let (mut client, mut rx, renderer) = joined(&broker, "alice").await;

    client.submit("hello everyone").unwrap();
    pump_until(&mut client, &mut rx, |c| {
        c.renderer()
            .messages()
            .iter()
            .any(|(envelope, _)| envelope.content == "hello everyone")
    })
    .await
    .unwrap();

    let sends = broker.wait_for(StompCommand::Send, 2).await.unwrap();
    assert_eq!(sends[1].get_header("destination"), Some("/app/chat.sendMessage"));
    assert_eq!(sends[1].get_header("content-type"), Some("application/json"));

    let (envelope, is_private) = renderer.messages().last().cloned().unwrap();
    assert_eq!(envelope.sender, "alice");
    assert_eq!(envelope.message_type, MessageType::Chat);
    assert!(!is_private);
}

#[tokio::test]
async fn test_user_count_delivered() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let (mut client, mut rx, _renderer) = joined(&broker, "alice").await;

    broker.publish(USER_COUNT_TOPIC, user_count_body(2));
    pump_until(&mut client, &mut rx, |c| {
        c.renderer().events().contains(&Rendered::UserCount("2".to_string()))
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_remote_typing_shown_then_expires() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let (mut client, mut rx, renderer) = client_for(
        &broker,
        TypingConfig {
            idle_ms: 100,
            expiry_ms: 200,
        },
    );
    client.connect("alice").unwrap();
    pump_until(&mut client, &mut rx, |c| c.presence().contains("alice"))
        .await
        .unwrap();

    broker.publish(TYPING_TOPIC, typing_body("bob"));
    pump_until(&mut client, &mut rx, |c| c.typing().shown_sender() == Some("bob"))
        .await
        .unwrap();
    assert_eq!(renderer.typing_indicator(), Some("bob is typing...".to_string()));

    pump_until(&mut client, &mut rx, |c| c.typing().shown_sender().is_none())
        .await
        .unwrap();
    assert_eq!(renderer.typing_indicator(), None);
}

// ============================================================================
// Teardown Tests
// ============================================================================

#[tokio::test]
async fn test_disconnect_sends_disconnect_frame() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let (mut client, _rx, _renderer) = joined(&broker, "alice").await;

    assert!(client.disconnect());
    assert_eq!(client.status(), SessionStatus::Disconnected);

    broker
        .wait_for(StompCommand::Disconnect, 1)
        .await
        .expect("broker never saw DISCONNECT");
}

#[tokio::test]
async fn test_broker_error_ends_session() {
    let broker = TestBroker::start().await.expect("Failed to start broker");
    let (mut client, mut rx, renderer) = joined(&broker, "alice").await;

    broker.fail_connection("broker shutting down");
    pump_until(&mut client, &mut rx, |c| c.status() == SessionStatus::Disconnected)
        .await
        .unwrap();

    assert!(client.presence().is_empty());
    assert_eq!(
        renderer.system_messages(),
        vec![CONNECTION_LOST_MESSAGE.to_string()]
    );
}
