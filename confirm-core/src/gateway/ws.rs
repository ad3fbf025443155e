//! Discord websocket gateway: receives button presses and publishes them to the hub.
//!
//! Only what prompts need is implemented: identify, heartbeat, dispatch of
//! `READY` and component `INTERACTION_CREATE` events. Resume is not; a
//! dropped session ends `run()` with an error and the caller decides whether
//! to start a new one.

use crate::gateway::{GatewayError, InteractionHub};
use crate::models::RawInteraction;
use crate::services::logging;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use url::Url;

const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_RECONNECT: u8 = 7;
const OP_INVALID_SESSION: u8 = 9;
const OP_HELLO: u8 = 10;
const OP_HEARTBEAT_ACK: u8 = 11;

/// INTERACTION_CREATE is delivered without any privileged intent.
const INTENTS: u64 = 0;

#[derive(Debug, Deserialize)]
struct GatewayPayload {
    op: u8,
    #[serde(default)]
    d: Value,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default)]
    t: Option<String>,
}

/// Per-connection bookkeeping
#[derive(Debug, Default)]
struct SessionState {
    sequence: Option<u64>,
    awaiting_ack: bool,
}

/// Websocket event source for one bot session
pub struct DiscordEventStream {
    url: String,
    token: String,
    hub: InteractionHub,
}

impl DiscordEventStream {
    /// Create a stream publishing into `hub`. Never log the token.
    pub fn new(url: String, token: String, hub: InteractionHub) -> Self {
        Self { url, token, hub }
    }

    /// Run the session on a background task.
    pub fn spawn(self) -> JoinHandle<Result<(), GatewayError>> {
        tokio::spawn(async move {
            let result = self.run().await;
            if let Err(e) = &result {
                logging::log_error(&e.to_string(), Some("Discord gateway session ended"));
            }
            result
        })
    }

    /// Connect, identify and pump events until the connection ends.
    pub async fn run(&self) -> Result<(), GatewayError> {
        let ws = self.connect_with_retry().await?;
        let (mut write, mut read) = ws.split();

        let hello = match read.next().await {
            Some(Ok(WsMessage::Text(text))) => serde_json::from_str::<GatewayPayload>(&text)?,
            Some(Ok(other)) => {
                return Err(GatewayError::Protocol(format!(
                    "expected Hello, got {:?}",
                    other
                )))
            }
            Some(Err(e)) => return Err(GatewayError::WebSocket(e.to_string())),
            None => return Err(GatewayError::Closed),
        };
        let heartbeat_ms = heartbeat_interval(&hello)?;
        tracing::debug!(heartbeat_ms, "Discord gateway hello received");

        write
            .send(WsMessage::Text(self.identify_payload().to_string()))
            .await
            .map_err(|e| GatewayError::WebSocket(e.to_string()))?;

        let period = Duration::from_millis(heartbeat_ms);
        let mut heartbeat = interval_at(Instant::now() + period, period);
        let mut state = SessionState::default();

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if state.awaiting_ack {
                        return Err(GatewayError::Protocol(
                            "heartbeat was not acknowledged".to_string(),
                        ));
                    }
                    state.awaiting_ack = true;
                    write
                        .send(WsMessage::Text(heartbeat_payload(state.sequence).to_string()))
                        .await
                        .map_err(|e| GatewayError::WebSocket(e.to_string()))?;
                }
                frame = read.next() => {
                    let reply = match frame {
                        None => return Err(GatewayError::Closed),
                        Some(Err(e)) => return Err(GatewayError::WebSocket(e.to_string())),
                        Some(Ok(WsMessage::Text(text))) => {
                            let payload: GatewayPayload = serde_json::from_str(&text)?;
                            self.handle_payload(payload, &mut state)?
                        }
                        Some(Ok(WsMessage::Close(frame))) => {
                            tracing::info!(?frame, "Discord gateway closed the connection");
                            return Err(GatewayError::Closed);
                        }
                        Some(Ok(_)) => None,
                    };
                    if let Some(reply) = reply {
                        write
                            .send(WsMessage::Text(reply.to_string()))
                            .await
                            .map_err(|e| GatewayError::WebSocket(e.to_string()))?;
                    }
                }
            }
        }
    }

    /// Apply one gateway payload. Returns a frame to send back, if any.
    fn handle_payload(
        &self,
        payload: GatewayPayload,
        state: &mut SessionState,
    ) -> Result<Option<Value>, GatewayError> {
        match payload.op {
            OP_DISPATCH => {
                if payload.s.is_some() {
                    state.sequence = payload.s;
                }
                self.handle_dispatch(payload.t.as_deref(), payload.d);
                Ok(None)
            }
            OP_HEARTBEAT => Ok(Some(heartbeat_payload(state.sequence))),
            OP_HEARTBEAT_ACK => {
                state.awaiting_ack = false;
                Ok(None)
            }
            OP_RECONNECT => Err(GatewayError::Protocol(
                "server requested reconnect".to_string(),
            )),
            OP_INVALID_SESSION => Err(GatewayError::Protocol("invalid session".to_string())),
            other => {
                tracing::debug!(op = other, "Ignoring gateway opcode");
                Ok(None)
            }
        }
    }

    fn handle_dispatch(&self, event: Option<&str>, data: Value) {
        match event {
            Some("READY") => {
                let user = data["user"]["username"].as_str().unwrap_or("unknown");
                tracing::info!(user, "Discord gateway session ready");
            }
            Some("INTERACTION_CREATE") => {
                let raw: RawInteraction = match serde_json::from_value(data) {
                    Ok(raw) => raw,
                    Err(e) => {
                        tracing::warn!(error = %e, "Malformed INTERACTION_CREATE payload");
                        return;
                    }
                };
                if let Some(interaction) = raw.into_component() {
                    let receivers = self.hub.publish(interaction);
                    tracing::debug!(receivers, "Component interaction published");
                }
            }
            other => tracing::trace!(event = ?other, "Ignoring gateway dispatch"),
        }
    }

    fn identify_payload(&self) -> Value {
        json!({
            "op": OP_IDENTIFY,
            "d": {
                "token": self.token,
                "intents": INTENTS,
                "properties": {
                    "os": std::env::consts::OS,
                    "browser": "discord-confirm",
                    "device": "discord-confirm"
                }
            }
        })
    }

    /// Connect to the gateway with retry logic and exponential backoff
    async fn connect_with_retry(
        &self,
    ) -> Result<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
        GatewayError,
    > {
        const MAX_RETRIES: u32 = 5;
        const INITIAL_DELAY_MS: u64 = 100;
        const MAX_DELAY_MS: u64 = 10000;

        let url = Url::parse(&self.url)
            .map_err(|e| GatewayError::Protocol(format!("invalid gateway URL: {}", e)))?;

        let mut delay = INITIAL_DELAY_MS;
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match connect_async(url.as_str()).await {
                Ok((ws_stream, _)) => return Ok(ws_stream),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Discord gateway connect failed");
                    last_error = Some(e);
                    if attempt + 1 < MAX_RETRIES {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay = std::cmp::min(delay * 2, MAX_DELAY_MS);
                    }
                }
            }
        }

        Err(GatewayError::WebSocket(format!(
            "failed to connect after {} attempts: {}",
            MAX_RETRIES,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }
}

fn heartbeat_interval(hello: &GatewayPayload) -> Result<u64, GatewayError> {
    if hello.op != OP_HELLO {
        return Err(GatewayError::Protocol(format!(
            "expected Hello (op {}), got op {}",
            OP_HELLO, hello.op
        )));
    }
    hello.d["heartbeat_interval"]
        .as_u64()
        .filter(|ms| *ms > 0)
        .ok_or_else(|| GatewayError::Protocol("Hello without heartbeat_interval".to_string()))
}

fn heartbeat_payload(sequence: Option<u64>) -> Value {
    json!({ "op": OP_HEARTBEAT, "d": sequence })
}
