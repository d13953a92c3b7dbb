use serde::{Deserialize, Serialize};

/// Frames sent from the client to the broker.
///
/// Destination strings are opaque here; the quiz convention puts broadcast
/// topics under `/topic/...` and publish targets under `/app/...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    #[serde(rename = "connect")]
    Connect {
        client: String,
        username: Option<String>,
        token: Option<String>,
    },

    #[serde(rename = "subscribe")]
    Subscribe { id: String, destination: String },

    #[serde(rename = "unsubscribe")]
    Unsubscribe { id: String },

    #[serde(rename = "send")]
    Send {
        destination: String,
        payload: String,
        timestamp: i64,
    },

    #[serde(rename = "disconnect")]
    Disconnect,
}

/// Frames sent from the broker to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    #[serde(rename = "connected")]
    Connected { session: String },

    #[serde(rename = "message")]
    Message { destination: String, payload: String },

    #[serde(rename = "error")]
    Error { message: String },
}
