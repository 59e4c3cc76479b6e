//! Optimistic like/unlike coordination.
//!
//! Each `(target, kind)` pair is either liked or unliked by the current user.
//! A toggle flips the liked-set membership and adjusts the stored like count
//! in the same synchronous step, then hands back a [`LikeCommand`] for the
//! remote call. The remote outcome is never reconciled: a failed call leaves
//! the optimistic state in place, so local state can drift from the server's
//! authoritative counts. It can never drift between the set and the counts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::feed_store::FeedStore;
use super::ids::{CommentId, PostId};
use super::trace_id::TraceId;

/// Kind of record a like applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A top-level post.
    Post,
    /// A comment at any nesting depth.
    Comment,
}

impl TargetKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

/// A likeable record, identified within its own namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    /// Like a post.
    Post(PostId),
    /// Like a comment.
    Comment(CommentId),
}

impl LikeTarget {
    /// Kind of the targeted record.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Post(_) => TargetKind::Post,
            Self::Comment(_) => TargetKind::Comment,
        }
    }

    /// Raw identifier of the targeted record.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Post(id) => id.as_str(),
            Self::Comment(id) => id.as_str(),
        }
    }
}

/// Direction of a like count adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeDirection {
    /// Add one like.
    Increment,
    /// Remove one like.
    Decrement,
}

/// Remote operation issued after an optimistic toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    /// Record a like.
    Add,
    /// Withdraw a like.
    Remove,
}

/// Remote like call produced by a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeCommand {
    /// Correlates the optimistic change with the remote call.
    pub trace_id: TraceId,
    /// Record being liked or unliked.
    pub target: LikeTarget,
    /// Whether the remote call adds or removes the like.
    pub action: LikeAction,
}

/// The current user's local like state over posts and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedSet {
    posts: BTreeSet<PostId>,
    comments: BTreeSet<CommentId>,
}

impl LikedSet {
    /// Whether `target` is currently liked.
    #[must_use]
    pub fn contains(&self, target: &LikeTarget) -> bool {
        match target {
            LikeTarget::Post(id) => self.posts.contains(id),
            LikeTarget::Comment(id) => self.comments.contains(id),
        }
    }

    /// Whether the post is liked.
    #[must_use]
    pub fn contains_post(&self, id: &PostId) -> bool {
        self.posts.contains(id)
    }

    /// Whether the comment is liked.
    #[must_use]
    pub fn contains_comment(&self, id: &CommentId) -> bool {
        self.comments.contains(id)
    }

    /// Number of liked records across both namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len().saturating_add(self.comments.len())
    }

    /// Whether nothing is liked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.comments.is_empty()
    }

    fn set(&mut self, target: LikeTarget, liked: bool) {
        match (target, liked) {
            (LikeTarget::Post(id), true) => {
                self.posts.insert(id);
            }
            (LikeTarget::Post(id), false) => {
                self.posts.remove(&id);
            }
            (LikeTarget::Comment(id), true) => {
                self.comments.insert(id);
            }
            (LikeTarget::Comment(id), false) => {
                self.comments.remove(&id);
            }
        }
    }
}

/// Applies optimistic like toggles to the liked-set and the feed store.
#[derive(Debug, Clone, Default)]
pub struct LikeCoordinator {
    liked: LikedSet,
}

impl LikeCoordinator {
    /// Create a coordinator with an empty liked-set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current liked-set.
    #[must_use]
    pub const fn liked(&self) -> &LikedSet {
        &self.liked
    }

    /// Toggle the like state of `target`.
    ///
    /// Returns the remote call to issue, or `None` when the target is not in
    /// the store (the toggle is rejected so set and counts stay aligned).
    pub fn toggle(&mut self, store: &mut FeedStore, target: LikeTarget) -> Option<LikeCommand> {
        if !store.contains(&target) {
            warn!(
                target_id = target.id(),
                target_kind = target.kind().as_str(),
                "ignoring like toggle for unknown target"
            );
            return None;
        }

        let was_liked = self.liked.contains(&target);
        let (action, direction) = if was_liked {
            (LikeAction::Remove, LikeDirection::Decrement)
        } else {
            (LikeAction::Add, LikeDirection::Increment)
        };

        store.update_like_count(&target, direction);
        self.liked.set(target.clone(), !was_liked);

        let trace_id = TraceId::generate();
        debug!(
            %trace_id,
            target_id = target.id(),
            target_kind = target.kind().as_str(),
            liked = !was_liked,
            "applied optimistic like toggle"
        );
        Some(LikeCommand {
            trace_id,
            target,
            action,
        })
    }
}
