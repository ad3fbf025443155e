//! Errors raised by messaging gateway calls

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Gateway protocol error: {0}")]
    Protocol(String),

    #[error("Gateway connection closed")]
    Closed,
}
