//! In-process broker fixture speaking the quizwire frame protocol.
//!
//! A minimal stand-in for the quiz platform's broker: it accepts WebSocket
//! connections, answers the connect handshake, tracks subscriptions per
//! destination, and fans published payloads out to subscribers. On top of
//! that it records every frame it receives for assertions, allows
//! server-side injection of messages, and can sever all open connections to
//! simulate a transport drop.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use futures_util::SinkExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_tungstenite::accept_async;
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::transport::frame::{ClientFrame, ServerFrame};

#[derive(Default)]
struct BrokerState {
    subscriptions: Vec<SubEntry>,
    received: Vec<ClientFrame>,
}

struct SubEntry {
    id: String,
    destination: String,
    sender: UnboundedSender<WsMessage>,
}

pub(crate) struct MockBroker {
    addr: SocketAddr,
    state: Arc<Mutex<BrokerState>>,
    kill_tx: broadcast::Sender<()>,
}

impl MockBroker {
    pub(crate) async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock broker");
        let addr = listener.local_addr().expect("mock broker local addr");
        let state = Arc::new(Mutex::new(BrokerState::default()));
        let (kill_tx, _) = broadcast::channel(4);

        let accept_state = state.clone();
        let accept_kill = kill_tx.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = accept_state.clone();
                let kill_rx = accept_kill.subscribe();
                tokio::spawn(handle_connection(stream, state, kill_rx));
            }
        });

        Self {
            addr,
            state,
            kill_tx,
        }
    }

    pub(crate) fn endpoint(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Server-side inject: delivers a payload to every subscriber of
    /// `destination`.
    pub(crate) fn publish(&self, destination: &str, payload: &str) {
        let frame = ServerFrame::Message {
            destination: destination.to_string(),
            payload: payload.to_string(),
        };
        let text = serde_json::to_string(&frame).expect("serialize server frame");

        let state = self.state.lock().unwrap();
        for entry in &state.subscriptions {
            if entry.destination == destination {
                let _ = entry.sender.send(WsMessage::text(text.clone()));
            }
        }
    }

    /// Every frame received so far, across all connections.
    pub(crate) fn received(&self) -> Vec<ClientFrame> {
        self.state.lock().unwrap().received.clone()
    }

    pub(crate) fn has_subscription(&self, destination: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .subscriptions
            .iter()
            .any(|entry| entry.destination == destination)
    }

    /// Severs every open connection, simulating a transport drop. The
    /// broker keeps accepting new connections afterwards.
    pub(crate) fn drop_connections(&self) {
        let _ = self.kill_tx.send(());
        self.state.lock().unwrap().subscriptions.clear();
    }
}

async fn handle_connection(
    stream: TcpStream,
    state: Arc<Mutex<BrokerState>>,
    mut kill_rx: broadcast::Receiver<()>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(_) => return,
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    // Forward queued frames to the client socket.
    let forward = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = kill_rx.recv() => break,
            message = ws_receiver.next() => {
                let Some(Ok(msg)) = message else { break };
                if msg.is_text() {
                    let Ok(frame) =
                        serde_json::from_str::<ClientFrame>(msg.to_text().unwrap_or_default())
                    else {
                        continue;
                    };
                    if !handle_frame(&state, &tx, frame) {
                        break;
                    }
                } else if let WsMessage::Ping(payload) = msg {
                    let _ = tx.send(WsMessage::Pong(payload));
                }
            },
        }
    }

    forward.abort();

    // Connection gone: drop its subscriptions.
    let mut state = state.lock().unwrap();
    state
        .subscriptions
        .retain(|entry| !entry.sender.same_channel(&tx));
}

/// Applies one frame; false ends the connection.
fn handle_frame(
    state: &Arc<Mutex<BrokerState>>,
    tx: &UnboundedSender<WsMessage>,
    frame: ClientFrame,
) -> bool {
    let mut state = state.lock().unwrap();
    state.received.push(frame.clone());

    match frame {
        ClientFrame::Connect { .. } => {
            let reply = ServerFrame::Connected {
                session: format!("session-{}", Uuid::new_v4()),
            };
            let text = serde_json::to_string(&reply).expect("serialize server frame");
            let _ = tx.send(WsMessage::text(text));
            true
        }
        ClientFrame::Subscribe { id, destination } => {
            state.subscriptions.push(SubEntry {
                id,
                destination,
                sender: tx.clone(),
            });
            true
        }
        ClientFrame::Unsubscribe { id } => {
            state.subscriptions.retain(|entry| entry.id != id);
            true
        }
        ClientFrame::Send {
            destination,
            payload,
            ..
        } => {
            let text = serde_json::to_string(&ServerFrame::Message {
                destination: destination.clone(),
                payload,
            })
            .expect("serialize server frame");
            for entry in &state.subscriptions {
                if entry.destination == destination {
                    let _ = entry.sender.send(WsMessage::text(text.clone()));
                }
            }
            true
        }
        ClientFrame::Disconnect => false,
    }
}
