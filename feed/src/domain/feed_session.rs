//! Feed session state machine.
//!
//! `FeedSession` owns the store and the like coordinator and applies one
//! [`FeedInput`] at a time, to completion. It performs no I/O: the resulting
//! [`FeedStep`] tells the runtime whether to publish a snapshot, issue a
//! remote like call, or stop.

use tracing::{debug, info, warn};

use super::feed_events::FeedEvent;
use super::feed_store::FeedStore;
use super::likes::{LikeCommand, LikeCoordinator, LikeTarget, LikedSet};
use super::ports::{FeedSourceError, LikeGatewayError};
use super::post::Post;

/// A discrete event processed by the feed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedInput {
    /// The initial fetch completed.
    Loaded(Result<Vec<Post>, FeedSourceError>),
    /// A live update arrived.
    Live(FeedEvent),
    /// The user toggled a like.
    ToggleLike(LikeTarget),
    /// A remote like call finished.
    LikeSettled {
        /// The command that was issued.
        command: LikeCommand,
        /// Remote outcome; only logged.
        outcome: Result<(), LikeGatewayError>,
    },
    /// The feed view is no longer active.
    TearDown,
}

impl FeedInput {
    const fn label(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::Live(_) => "live",
            Self::ToggleLike(_) => "toggle_like",
            Self::LikeSettled { .. } => "like_settled",
            Self::TearDown => "tear_down",
        }
    }
}

/// What the runtime should do after an input is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStep {
    /// State did not change.
    Unchanged,
    /// State changed; publish a fresh snapshot.
    Updated,
    /// State changed optimistically; publish and issue the remote call.
    IssueLike(LikeCommand),
    /// The session has ended; stop processing.
    Stopped,
}

/// Immutable copy of the feed state handed to readers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Posts, most recent first, each with its flat comment list.
    pub posts: Vec<Post>,
    /// The current user's liked records.
    pub liked: LikedSet,
}

/// Single owner of mutable feed state.
#[derive(Debug)]
pub struct FeedSession {
    store: FeedStore,
    likes: LikeCoordinator,
    active: bool,
}

impl Default for FeedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSession {
    /// Start an active session with an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: FeedStore::new(),
            likes: LikeCoordinator::new(),
            active: true,
        }
    }

    /// Whether the session still accepts inputs.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Current feed store.
    #[must_use]
    pub const fn store(&self) -> &FeedStore {
        &self.store
    }

    /// Copy the current state for readers.
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            posts: self.store.posts().to_vec(),
            liked: self.likes.liked().clone(),
        }
    }

    /// Apply one input to completion.
    ///
    /// Inputs arriving after teardown are ignored and report
    /// [`FeedStep::Stopped`].
    pub fn apply(&mut self, input: FeedInput) -> FeedStep {
        if !self.active {
            debug!(input = input.label(), "ignoring input after teardown");
            return FeedStep::Stopped;
        }

        match input {
            FeedInput::Loaded(result) => self.apply_loaded(result),
            FeedInput::Live(event) => self.apply_live(event),
            FeedInput::ToggleLike(target) => self
                .likes
                .toggle(&mut self.store, target)
                .map_or(FeedStep::Unchanged, FeedStep::IssueLike),
            FeedInput::LikeSettled { command, outcome } => {
                log_settled(&command, outcome.as_ref());
                FeedStep::Unchanged
            }
            FeedInput::TearDown => {
                info!("feed session torn down");
                self.active = false;
                FeedStep::Stopped
            }
        }
    }

    fn apply_loaded(&mut self, result: Result<Vec<Post>, FeedSourceError>) -> FeedStep {
        match result {
            Ok(posts) => {
                info!(posts = posts.len(), "feed loaded");
                self.store.replace(posts);
                FeedStep::Updated
            }
            Err(error) => {
                warn!(%error, "feed fetch failed; keeping current state");
                FeedStep::Unchanged
            }
        }
    }

    fn apply_live(&mut self, event: FeedEvent) -> FeedStep {
        debug!(kind = event.kind(), "applying live event");
        match event {
            FeedEvent::PostPublished(post) => {
                self.store.prepend_post(post);
                FeedStep::Updated
            }
            FeedEvent::CommentPublished { post_id, comment } => {
                if self.store.append_comment(&post_id, comment) {
                    FeedStep::Updated
                } else {
                    FeedStep::Unchanged
                }
            }
        }
    }
}

fn log_settled(command: &LikeCommand, outcome: Result<&(), &LikeGatewayError>) {
    match outcome {
        Ok(()) => debug!(
            trace_id = %command.trace_id,
            target_id = command.target.id(),
            "like call settled"
        ),
        Err(error) => warn!(
            trace_id = %command.trace_id,
            target_id = command.target.id(),
            target_kind = command.target.kind().as_str(),
            %error,
            "like call failed; optimistic state kept"
        ),
    }
}
