//! Feed records: authors, posts, and flat comments.
//!
//! These types double as the wire contract shared by the feed fetch response
//! and live-update messages. Field names follow the remote document store
//! (`_id`, `authorId`, `likeCount`, ...). Unknown fields are ignored and
//! missing counters default to zero. An author may arrive populated, as a
//! bare id, or not at all.

use serde::{Deserialize, Serialize};

use super::ids::{AuthorId, CommentId, PostId};
use super::timestamp::LogicalTimestamp;

/// Identity attached to a post or comment. Immutable once attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AuthorRecord")]
pub struct Author {
    /// Unique author identifier.
    #[serde(rename = "_id")]
    pub id: AuthorId,
    /// Display handle.
    #[serde(default)]
    pub username: String,
}

impl Author {
    /// Construct an author from an id and handle.
    pub fn new(id: impl Into<AuthorId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorRecord {
    Populated {
        #[serde(rename = "_id")]
        id: AuthorId,
        #[serde(default)]
        username: String,
    },
    Reference(AuthorId),
    Missing,
}

impl From<AuthorRecord> for Author {
    fn from(value: AuthorRecord) -> Self {
        match value {
            AuthorRecord::Populated { id, username } => Self { id, username },
            AuthorRecord::Reference(id) => Self {
                id,
                username: String::new(),
            },
            AuthorRecord::Missing => Self::default(),
        }
    }
}

/// A comment as received: flat, referencing its parent by id.
///
/// A `parent_comment_id` of `None` marks a top-level comment. A parent id that
/// does not resolve within the post's current comment list is treated as
/// top-level when the thread is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Stable comment identifier.
    #[serde(rename = "_id")]
    pub id: CommentId,
    /// Post that owns this comment; live messages may leave it to the envelope.
    #[serde(default)]
    pub post_id: PostId,
    /// Parent comment, if this is a nested reply.
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
    /// Comment author.
    #[serde(rename = "authorId", default)]
    pub author: Author,
    /// Text content.
    #[serde(default)]
    pub content: String,
    /// Logical timestamp used for ordering siblings.
    #[serde(default)]
    pub timestamp: LogicalTimestamp,
    /// Number of likes.
    #[serde(default)]
    pub like_count: u64,
    /// Creation time.
    #[serde(default)]
    pub created_at: LogicalTimestamp,
    /// Last update time.
    #[serde(default)]
    pub updated_at: LogicalTimestamp,
}

/// A top-level feed entry with its flat, unordered comment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable post identifier.
    #[serde(rename = "_id")]
    pub id: PostId,
    /// Post author.
    #[serde(rename = "authorId", default)]
    pub author: Author,
    /// Text content.
    #[serde(default)]
    pub content: String,
    /// Logical timestamp.
    #[serde(default)]
    pub timestamp: LogicalTimestamp,
    /// Number of likes.
    #[serde(default)]
    pub like_count: u64,
    /// Reply count as reported by the server.
    #[serde(default)]
    pub reply_count: u64,
    /// Flat comment list; presentation order is derived, never stored.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Creation time.
    #[serde(default)]
    pub created_at: LogicalTimestamp,
    /// Last update time.
    #[serde(default)]
    pub updated_at: LogicalTimestamp,
}

impl Post {
    /// Find a comment in the flat list by id.
    #[must_use]
    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| &comment.id == id)
    }
}
