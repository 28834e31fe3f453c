use std::sync::Arc;

use anyhow::Context;
use futures_util::FutureExt;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::{Event, Payload};
use serde_json::Value;
use tracing::{info, warn};

use super::command::{RemoteCommandHandler, REMOTE_EVENTS};

/// socket.io listener feeding remote commands to the kiosk.
///
/// Connection status is reported through tracing; the client reconnects on
/// its own after the server drops the connection.
pub struct SocketIoRemote {
    client: Client,
    url: String,
}

impl SocketIoRemote {
    pub async fn connect(url: &str, handler: Arc<RemoteCommandHandler>) -> anyhow::Result<Self> {
        let mut builder = ClientBuilder::new(url)
            .reconnect_on_disconnect(true)
            .on(Event::Connect, |_, _| {
                async { info!("connected to remote input server") }.boxed()
            })
            .on(Event::Close, |_, _| {
                async { warn!("disconnected from remote input server") }.boxed()
            })
            .on(Event::Error, |payload, _| {
                async move { warn!(error = ?payload, "remote input socket error") }.boxed()
            });

        for event in REMOTE_EVENTS {
            let handler = Arc::clone(&handler);
            builder = builder.on(event, move |payload, _: Client| {
                let handler = Arc::clone(&handler);
                async move {
                    handler
                        .handle_event(event, &first_argument(payload))
                        .await
                }
                .boxed()
            });
        }

        let client = builder
            .connect()
            .await
            .with_context(|| format!("Failed to connect to remote input server at {url}"))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub async fn disconnect(self) -> anyhow::Result<()> {
        self.client
            .disconnect()
            .await
            .context("Failed to disconnect from remote input server")?;
        info!(url = %self.url, "remote input closed");
        Ok(())
    }
}

/// First emitted argument, or `Null` when there is none.
#[allow(deprecated)]
fn first_argument(payload: Payload) -> Value {
    match payload {
        Payload::Text(mut args) if !args.is_empty() => args.swap_remove(0),
        Payload::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
