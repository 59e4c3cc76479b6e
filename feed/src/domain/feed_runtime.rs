//! Event loop owning the feed session.
//!
//! All inputs funnel through one unbounded channel and are applied in
//! arrival order by a single task. Remote calls run on spawned tasks holding
//! only a weak sender, so a completion that lands after teardown is dropped
//! instead of touching discarded state. Readers observe state exclusively
//! through [`FeedSnapshot`]s published on a watch channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use super::feed_events::FeedEvent;
use super::feed_session::{FeedInput, FeedSession, FeedSnapshot, FeedStep};
use super::ids::UserId;
use super::likes::{LikeAction, LikeCommand, LikeTarget};
use super::ports::{FeedClosedError, FeedSource, LikeGateway, LiveUpdateSink};
use super::trace_id::TraceId;

/// Owner task for the feed session.
pub struct FeedRuntime {
    session: FeedSession,
    inputs: mpsc::UnboundedReceiver<FeedInput>,
    completions: mpsc::WeakUnboundedSender<FeedInput>,
    snapshots: watch::Sender<FeedSnapshot>,
    source: Arc<dyn FeedSource>,
    likes: Arc<dyn LikeGateway>,
    user_id: UserId,
}

/// Cloneable handle for submitting inputs and observing snapshots.
///
/// Dropping every handle ends the runtime as if [`FeedHandle::tear_down`]
/// had been called.
#[derive(Clone)]
pub struct FeedHandle {
    inputs: mpsc::UnboundedSender<FeedInput>,
    snapshots: watch::Receiver<FeedSnapshot>,
}

impl FeedRuntime {
    /// Create a runtime and its first handle.
    pub fn new(
        source: Arc<dyn FeedSource>,
        likes: Arc<dyn LikeGateway>,
        user_id: UserId,
    ) -> (Self, FeedHandle) {
        let (sender, inputs) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(FeedSnapshot::default());
        let runtime = Self {
            session: FeedSession::new(),
            inputs,
            completions: sender.downgrade(),
            snapshots,
            source,
            likes,
            user_id,
        };
        let handle = FeedHandle {
            inputs: sender,
            snapshots: snapshot_rx,
        };
        (runtime, handle)
    }

    /// Fetch the initial feed and process inputs until teardown.
    pub async fn run(mut self) {
        self.spawn_fetch();

        while let Some(input) = self.inputs.recv().await {
            match self.session.apply(input) {
                FeedStep::Unchanged => {}
                FeedStep::Updated => self.publish(),
                FeedStep::IssueLike(command) => {
                    self.publish();
                    self.spawn_like(command);
                }
                FeedStep::Stopped => break,
            }
        }
        self.inputs.close();
        debug!("feed runtime stopped");
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }

    fn spawn_fetch(&self) {
        let source = Arc::clone(&self.source);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = source.fetch_posts().await;
            complete(&completions, FeedInput::Loaded(result));
        });
    }

    fn spawn_like(&self, command: LikeCommand) {
        let likes = Arc::clone(&self.likes);
        let completions = self.completions.clone();
        let user_id = self.user_id.clone();
        let trace_id = command.trace_id;
        tokio::spawn(TraceId::scope(trace_id, async move {
            let outcome = match command.action {
                LikeAction::Add => likes.add_like(&user_id, &command.target).await,
                LikeAction::Remove => likes.remove_like(&user_id, &command.target).await,
            };
            complete(&completions, FeedInput::LikeSettled { command, outcome });
        }));
    }
}

fn complete(completions: &mpsc::WeakUnboundedSender<FeedInput>, input: FeedInput) {
    let delivered = completions
        .upgrade()
        .is_some_and(|sender| sender.send(input).is_ok());
    if !delivered {
        debug!("dropping completion after teardown");
    }
}

impl FeedHandle {
    /// Request a like toggle on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedClosedError::Closed`] once the runtime has stopped.
    pub fn toggle_like(&self, target: LikeTarget) -> Result<(), FeedClosedError> {
        self.send(FeedInput::ToggleLike(target))
    }

    /// Stop the runtime. Later inputs are ignored.
    pub fn tear_down(&self) {
        if self.send(FeedInput::TearDown).is_err() {
            debug!("feed runtime already stopped");
        }
    }

    /// Whether the runtime has stopped accepting inputs.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inputs.is_closed()
    }

    /// Subscribe to published snapshots.
    #[must_use]
    pub fn snapshots(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshots.clone()
    }

    fn send(&self, input: FeedInput) -> Result<(), FeedClosedError> {
        self.inputs
            .send(input)
            .map_err(|_| FeedClosedError::closed())
    }
}

impl LiveUpdateSink for FeedHandle {
    fn deliver(&self, event: FeedEvent) -> Result<(), FeedClosedError> {
        self.send(FeedInput::Live(event))
    }
}
