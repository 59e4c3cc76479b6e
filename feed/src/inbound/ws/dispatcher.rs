//! Live update dispatcher: the per-connection loop over the socket.
//!
//! Incoming text frames are decoded and forwarded to the feed in arrival
//! order. Pings are answered, compose requests queued by
//! [`LiveChannelPublisher`](super::LiveChannelPublisher) are written out, and
//! a shutdown request closes the socket with a normal close code. Undecodable
//! frames are dropped without ending the session.

use std::sync::Arc;

use awc::error::WsProtocolError;
use awc::ws::{CloseCode, CloseReason, Frame, Message};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::messages::{ClientMessage, LiveMessageError, LiveUpdate, decode_live_update};
use crate::domain::ports::LiveUpdateSink;

/// How a dispatcher session ended.
#[derive(Debug)]
pub enum LiveSessionEnd {
    /// Shutdown was requested locally.
    Shutdown,
    /// The feed stopped accepting events.
    FeedClosed,
    /// The server sent a close frame.
    ServerClosed(Option<CloseReason>),
    /// The frame stream ended without a close frame.
    StreamClosed,
    /// The server violated the WebSocket protocol.
    Protocol(WsProtocolError),
    /// Writing to the socket failed.
    Network(WsProtocolError),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

/// Requests a graceful dispatcher shutdown.
#[derive(Debug)]
pub struct DispatcherShutdown(oneshot::Sender<()>);

impl DispatcherShutdown {
    /// Ask the dispatcher to close the socket and stop.
    pub fn shutdown(self) {
        if self.0.send(()).is_err() {
            debug!("live dispatcher already stopped");
        }
    }
}

/// Per-connection loop forwarding live updates to the feed.
pub struct LiveUpdateDispatcher {
    sink: Arc<dyn LiveUpdateSink>,
    outgoing: mpsc::UnboundedReceiver<ClientMessage>,
    shutdown: oneshot::Receiver<()>,
}

impl LiveUpdateDispatcher {
    pub(super) fn new(
        sink: Arc<dyn LiveUpdateSink>,
        outgoing: mpsc::UnboundedReceiver<ClientMessage>,
    ) -> (Self, DispatcherShutdown) {
        let (shutdown_tx, shutdown) = oneshot::channel();
        let dispatcher = Self {
            sink,
            outgoing,
            shutdown,
        };
        (dispatcher, DispatcherShutdown(shutdown_tx))
    }

    /// Run until shutdown, server close, or feed teardown.
    ///
    /// `frames` and `socket` are the two halves of a connected WebSocket.
    pub async fn run<F, K>(self, mut frames: F, mut socket: K) -> LiveSessionEnd
    where
        F: Stream<Item = Result<Frame, WsProtocolError>> + Unpin,
        K: Sink<Message, Error = WsProtocolError> + Unpin,
    {
        let Self {
            sink,
            mut outgoing,
            mut shutdown,
        } = self;
        let mut outgoing_open = true;

        loop {
            let result = tokio::select! {
                _ = &mut shutdown => Err(LiveSessionEnd::Shutdown),
                message = outgoing.recv(), if outgoing_open => {
                    match message {
                        Some(message) => send_client_message(&mut socket, &message).await,
                        None => {
                            outgoing_open = false;
                            Ok(())
                        }
                    }
                }
                frame = frames.next() => handle_frame(sink.as_ref(), &mut socket, frame).await,
            };

            if let Err(end) = result {
                log_session_end(&end);
                close_socket_if_needed(&mut socket, close_action_for(&end)).await;
                return end;
            }
        }
    }
}

async fn handle_frame<K>(
    sink: &dyn LiveUpdateSink,
    socket: &mut K,
    frame: Option<Result<Frame, WsProtocolError>>,
) -> Result<(), LiveSessionEnd>
where
    K: Sink<Message, Error = WsProtocolError> + Unpin,
{
    let Some(frame) = frame else {
        return Err(LiveSessionEnd::StreamClosed);
    };

    match frame.map_err(LiveSessionEnd::Protocol)? {
        Frame::Text(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            handle_text(sink, &text)
        }
        Frame::Ping(payload) => socket
            .send(Message::Pong(payload))
            .await
            .map_err(LiveSessionEnd::Network),
        Frame::Close(reason) => Err(LiveSessionEnd::ServerClosed(reason)),
        Frame::Binary(_) | Frame::Continuation(_) | Frame::Pong(_) => Ok(()),
    }
}

fn handle_text(sink: &dyn LiveUpdateSink, text: &str) -> Result<(), LiveSessionEnd> {
    match decode_live_update(text) {
        Ok(LiveUpdate::Event(event)) => {
            let kind = event.kind();
            sink.deliver(event).map_err(|_| LiveSessionEnd::FeedClosed)?;
            debug!(kind, "forwarded live event");
            Ok(())
        }
        Ok(LiveUpdate::Ignored(kind)) => {
            debug!(%kind, "ignoring live message of unknown type");
            Ok(())
        }
        Err(error) => {
            log_rejected_frame(&error);
            Ok(())
        }
    }
}

fn log_rejected_frame(error: &LiveMessageError) {
    warn!(%error, "dropping malformed live message");
}

async fn send_client_message<K>(
    socket: &mut K,
    message: &ClientMessage,
) -> Result<(), LiveSessionEnd>
where
    K: Sink<Message, Error = WsProtocolError> + Unpin,
{
    let body = match serde_json::to_string(message) {
        Ok(body) => body,
        Err(error) => {
            warn!(%error, "failed to encode outbound live message");
            return Ok(());
        }
    };
    socket
        .send(Message::Text(body.into()))
        .await
        .map_err(LiveSessionEnd::Network)
}

fn log_session_end(end: &LiveSessionEnd) {
    match end {
        LiveSessionEnd::Shutdown => info!("live channel shutting down"),
        LiveSessionEnd::FeedClosed => info!("feed closed; leaving live channel"),
        LiveSessionEnd::ServerClosed(reason) => {
            info!(reason = ?reason, "live channel closed by server");
        }
        LiveSessionEnd::StreamClosed => warn!("live channel stream ended"),
        LiveSessionEnd::Protocol(error) => warn!(%error, "live channel protocol error"),
        LiveSessionEnd::Network(error) => {
            warn!(%error, "live channel send failed; closing connection");
        }
    }
}

fn close_action_for(end: &LiveSessionEnd) -> CloseAction {
    match end {
        LiveSessionEnd::Shutdown | LiveSessionEnd::FeedClosed => {
            CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("feed closed".to_owned()),
            }))
        }
        LiveSessionEnd::ServerClosed(reason) => CloseAction::Close(reason.clone()),
        LiveSessionEnd::Protocol(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        LiveSessionEnd::StreamClosed | LiveSessionEnd::Network(_) => CloseAction::None,
    }
}

async fn close_socket_if_needed<K>(socket: &mut K, action: CloseAction)
where
    K: Sink<Message, Error = WsProtocolError> + Unpin,
{
    if let CloseAction::Close(reason) = action {
        if let Err(error) = socket.send(Message::Close(reason)).await {
            warn!(%error, "failed to close live channel");
            return;
        }
        if let Err(error) = socket.close().await {
            debug!(%error, "live channel sink did not close cleanly");
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
