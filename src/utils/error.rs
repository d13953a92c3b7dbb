use thiserror::Error;
use tungstenite::Error as WsError;

/// Errors produced by the realtime session and its transport.
///
/// Nothing here is fatal to the hosting process. Connection problems are
/// retried by the socket worker; caller misuse (publishing or subscribing
/// while disconnected) is reported and the operation dropped.
#[derive(Debug, Error)]
pub enum SessionError {
    /// WebSocket transport error.
    #[error("websocket error: {0}")]
    WebSocket(#[from] WsError),

    /// JSON frame encode/decode error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operation requires a connected session.
    #[error("session is not connected")]
    NotConnected,

    /// The socket worker is gone and can no longer accept commands.
    #[error("session command channel is closed")]
    ChannelClosed,

    /// The broker violated the expected frame exchange.
    #[error("protocol error: {0}")]
    Protocol(String),
}
