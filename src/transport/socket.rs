//! Reconnecting socket worker.
//!
//! The worker owns the WebSocket stream for one session generation. It runs
//! the connect handshake, then a single select loop multiplexing outbound
//! commands, inbound frames and the keepalive ticker. When the transport
//! drops, the subscription set is cleared and the worker re-enters the
//! connect loop after a fixed delay until the session is torn down.

use std::sync::Weak;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::session::client::SessionInner;
use crate::transport::frame::{ClientFrame, ServerFrame};
use crate::utils::error::SessionError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Commands accepted by the socket worker.
#[derive(Debug)]
pub(crate) enum Command {
    Frame(ClientFrame),
    Shutdown,
}

enum Outcome {
    /// Explicit disconnect; the worker stops.
    Shutdown,
    /// Transport dropped or the broker reported an error; reconnect.
    Lost,
    /// Worker superseded or every session handle gone; stop silently.
    Halt,
}

pub(crate) async fn run_worker(
    inner: Weak<SessionInner>,
    generation: u64,
    mut command_rx: UnboundedReceiver<Command>,
) {
    let (endpoint, reconnect_delay) = match inner.upgrade() {
        Some(session) => (
            session.config.endpoint.clone(),
            session.config.reconnect_delay,
        ),
        None => return,
    };

    loop {
        let outcome = run_connection(&inner, generation, &mut command_rx)
            .await
            .unwrap_or_else(|err| {
                warn!("connection to {endpoint} failed: {err}");
                Outcome::Lost
            });

        match outcome {
            Outcome::Shutdown | Outcome::Halt => break,
            Outcome::Lost => {
                let Some(session) = inner.upgrade() else { break };
                session.mark_connection_lost(generation);
            }
        }

        debug!("retrying {endpoint} in {reconnect_delay:?}");
        if idle_until_retry(reconnect_delay, &mut command_rx).await {
            break;
        }
    }

    if let Some(session) = inner.upgrade() {
        session.worker_finished(generation);
    }
}

async fn run_connection(
    inner: &Weak<SessionInner>,
    generation: u64,
    command_rx: &mut UnboundedReceiver<Command>,
) -> Result<Outcome, SessionError> {
    let (endpoint, heartbeat, connect_frame) = {
        let Some(session) = inner.upgrade() else {
            return Ok(Outcome::Halt);
        };
        if !session.begin_connecting(generation) {
            return Ok(Outcome::Halt);
        }
        (
            session.config.endpoint.clone(),
            session.config.heartbeat_interval,
            session.connect_frame(),
        )
    };

    let (mut socket, _) = connect_async(endpoint.as_str()).await?;
    send_frame(&mut socket, &connect_frame).await?;

    // Handshake: the broker must answer the connect frame before anything
    // else is exchanged.
    let session_id = loop {
        tokio::select! {
            command = command_rx.recv() => match command {
                Some(Command::Shutdown) => {
                    let _ = socket.close(None).await;
                    return Ok(Outcome::Shutdown);
                }
                Some(Command::Frame(frame)) => {
                    debug!("dropping {frame:?} issued before handshake completed");
                }
                None => {
                    let _ = socket.close(None).await;
                    return Ok(Outcome::Halt);
                }
            },
            message = socket.next() => match message {
                Some(Ok(msg)) if msg.is_text() => {
                    match serde_json::from_str::<ServerFrame>(msg.to_text()?)? {
                        ServerFrame::Connected { session } => break session,
                        ServerFrame::Error { message } => {
                            return Err(SessionError::Protocol(message));
                        }
                        ServerFrame::Message { destination, .. } => {
                            debug!("ignoring {destination} delivery during handshake");
                        }
                    }
                }
                Some(Ok(WsMessage::Ping(payload))) => {
                    socket.send(WsMessage::Pong(payload)).await?;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => {
                    return Err(SessionError::Protocol(
                        "socket closed during handshake".to_string(),
                    ));
                }
            },
        }
    };

    {
        let Some(session) = inner.upgrade() else {
            let _ = socket.close(None).await;
            return Ok(Outcome::Halt);
        };
        if !session.mark_connected(generation, session_id) {
            let _ = socket.close(None).await;
            return Ok(Outcome::Halt);
        }
    }

    let heartbeat = if heartbeat.is_zero() {
        Duration::from_millis(4000)
    } else {
        heartbeat
    };
    let stale_after = heartbeat * 2;
    let mut keepalive = tokio::time::interval(heartbeat);
    let mut last_inbound = Instant::now();

    loop {
        tokio::select! {
            command = command_rx.recv() => match command {
                Some(Command::Frame(frame)) => {
                    if let Err(err) = send_frame(&mut socket, &frame).await {
                        warn!("outbound frame dropped: {err}");
                        return Ok(Outcome::Lost);
                    }
                }
                Some(Command::Shutdown) => {
                    let _ = send_frame(&mut socket, &ClientFrame::Disconnect).await;
                    let _ = socket.close(None).await;
                    return Ok(Outcome::Shutdown);
                }
                None => {
                    let _ = send_frame(&mut socket, &ClientFrame::Disconnect).await;
                    let _ = socket.close(None).await;
                    return Ok(Outcome::Halt);
                }
            },
            message = socket.next() => {
                last_inbound = Instant::now();
                match message {
                    Some(Ok(msg)) if msg.is_text() => {
                        if let Some(outcome) = apply_inbound(inner, msg.to_text()?) {
                            let _ = socket.close(None).await;
                            return Ok(outcome);
                        }
                    }
                    Some(Ok(WsMessage::Ping(payload))) => {
                        if socket.send(WsMessage::Pong(payload)).await.is_err() {
                            return Ok(Outcome::Lost);
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => return Ok(Outcome::Lost),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("socket error: {err}");
                        return Ok(Outcome::Lost);
                    }
                    None => return Ok(Outcome::Lost),
                }
            },
            _ = keepalive.tick() => {
                if last_inbound.elapsed() > stale_after {
                    warn!(
                        "no traffic from broker for {:?}, dropping connection",
                        last_inbound.elapsed()
                    );
                    return Ok(Outcome::Lost);
                }
                if socket.send(WsMessage::Ping(vec![].into())).await.is_err() {
                    return Ok(Outcome::Lost);
                }
            }
        }
    }
}

/// Routes one inbound text frame. `Some` ends the connection.
fn apply_inbound(inner: &Weak<SessionInner>, text: &str) -> Option<Outcome> {
    match serde_json::from_str::<ServerFrame>(text) {
        Ok(ServerFrame::Message {
            destination,
            payload,
        }) => match inner.upgrade() {
            Some(session) => {
                session.dispatch(&destination, &payload);
                None
            }
            None => Some(Outcome::Halt),
        },
        Ok(ServerFrame::Error { message }) => {
            if let Some(session) = inner.upgrade() {
                session.report_error(&message);
            }
            Some(Outcome::Lost)
        }
        Ok(ServerFrame::Connected { .. }) => None,
        Err(err) => {
            warn!("ignoring invalid frame from broker: {err}");
            None
        }
    }
}

async fn send_frame(socket: &mut WsStream, frame: &ClientFrame) -> Result<(), SessionError> {
    let text = serde_json::to_string(frame)?;
    socket.send(WsMessage::text(text)).await?;
    Ok(())
}

/// Waits out the fixed reconnect delay, draining commands. Frames issued
/// while disconnected are dropped, not queued. Returns true when the worker
/// should stop instead of retrying.
async fn idle_until_retry(delay: Duration, command_rx: &mut UnboundedReceiver<Command>) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            command = command_rx.recv() => match command {
                Some(Command::Shutdown) => return true,
                Some(Command::Frame(frame)) => {
                    debug!("dropping {frame:?} issued while disconnected");
                }
                None => return true,
            },
        }
    }
}
