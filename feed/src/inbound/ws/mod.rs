//! WebSocket client adapter for the live-update channel.
//!
//! Responsibilities:
//! - connect to the configured endpoint with `awc`
//! - run the per-connection [`LiveUpdateDispatcher`]
//! - expose [`LiveChannelPublisher`] so compose requests share the socket

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

use crate::domain::ComposeRequest;
use crate::domain::ports::{ComposePublishError, ComposePublisher, LiveUpdateSink};

mod dispatcher;

pub mod messages;

pub use dispatcher::{DispatcherShutdown, LiveSessionEnd, LiveUpdateDispatcher};

use messages::ClientMessage;

/// Connected WebSocket framed with the client codec.
pub type LiveSocket = actix_codec::Framed<awc::BoxedSocket, awc::ws::Codec>;

/// Raised when the live channel cannot be opened.
#[derive(Debug, Error)]
#[error("live channel connection to {url} failed: {message}")]
pub struct LiveConnectError {
    /// Endpoint that was dialled.
    pub url: Url,
    /// Client diagnostic.
    pub message: String,
}

/// Open the live-update socket.
///
/// The returned socket is not `Send`; drive it on the actix local executor.
///
/// # Errors
///
/// Returns [`LiveConnectError`] when the handshake fails.
pub async fn connect(ws_url: &Url) -> Result<LiveSocket, LiveConnectError> {
    let (response, socket) = awc::Client::default()
        .ws(ws_url.as_str())
        .connect()
        .await
        .map_err(|error| LiveConnectError {
            url: ws_url.clone(),
            message: error.to_string(),
        })?;
    debug!(status = %response.status(), url = %ws_url, "live channel connected");
    Ok(socket)
}

/// Wire a dispatcher to `sink` together with its publisher and shutdown handle.
pub fn live_channel(
    sink: Arc<dyn LiveUpdateSink>,
) -> (LiveUpdateDispatcher, LiveChannelPublisher, DispatcherShutdown) {
    let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
    let (dispatcher, shutdown) = LiveUpdateDispatcher::new(sink, outgoing_rx);
    let publisher = LiveChannelPublisher {
        outgoing: outgoing_tx,
    };
    (dispatcher, publisher, shutdown)
}

/// Queues compose requests for the dispatcher to send.
#[derive(Debug, Clone)]
pub struct LiveChannelPublisher {
    outgoing: mpsc::UnboundedSender<ClientMessage>,
}

#[async_trait]
impl ComposePublisher for LiveChannelPublisher {
    async fn publish(&self, request: ComposeRequest) -> Result<(), ComposePublishError> {
        self.outgoing
            .send(ClientMessage::from(request))
            .map_err(|_| ComposePublishError::disconnected())
    }
}
