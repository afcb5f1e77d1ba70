//! Chat client entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-client -- [username]
//! ```
//!
//! Configuration is loaded from environment variables. Logs go to stderr.

use anyhow::Context;
use chat_client::events::{self, EventSender};
use chat_client::input::{parse_line, InputAction, HELP};
use chat_client::{event_loop, ChatClient, ClientEvent, StompTransport, TerminalRenderer, TokioScheduler, UiEvent};
use chat_common::{try_init_tracing, try_init_tracing_with_config, ClientConfig, TracingConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Chat client failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            return Err(e).context("Failed to load configuration");
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_client(&config)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        broker = %config.broker.url,
        "Configuration loaded"
    );

    let (tx, rx) = events::channel();
    let transport = StompTransport::new(tx.clone());
    let scheduler = TokioScheduler::new(tx.clone());
    let mut client = ChatClient::from_config(transport, TerminalRenderer::stdout(), scheduler, &config);

    println!("{HELP}");

    if let Some(username) = std::env::args().nth(1) {
        tx.send(UiEvent::ConnectRequested(username).into())
            .context("Event loop closed")?;
    }

    tokio::spawn(read_stdin(tx.clone()));
    tokio::spawn(forward_ctrl_c(tx));

    let handled = event_loop::run(&mut client, rx).await;
    info!(handled, "Chat client stopped");
    Ok(())
}

/// Post one event per input line; EOF shuts the client down
async fn read_stdin(events: EventSender) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read input");
                break;
            }
        };

        match parse_line(&line) {
            InputAction::Help => println!("{HELP}"),
            InputAction::Invalid(reason) => println!("!!! {reason}"),
            action => {
                let quit = action == InputAction::Quit;
                if let Some(event) = action.into_event() {
                    if events.send(event).is_err() || quit {
                        return;
                    }
                }
            }
        }
    }

    let _ = events.send(ClientEvent::Shutdown);
}

async fn forward_ctrl_c(events: EventSender) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Interrupted");
        let _ = events.send(ClientEvent::Shutdown);
    }
}
