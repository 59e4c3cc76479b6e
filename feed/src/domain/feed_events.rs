//! Live feed events, decoded from the update channel by inbound adapters.
//!
//! Events stay transport agnostic so the feed state only ever sees complete,
//! typed records.

use super::ids::PostId;
use super::post::{Comment, Post};

/// A live change to the feed, applied in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A new post was published.
    PostPublished(Post),
    /// A new comment was added to a post.
    CommentPublished {
        /// Post receiving the comment.
        post_id: PostId,
        /// The complete comment record.
        comment: Comment,
    },
}

impl FeedEvent {
    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PostPublished(_) => "post",
            Self::CommentPublished { .. } => "comment",
        }
    }
}
