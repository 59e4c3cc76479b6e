//! Outbound compose requests: new posts and replies.
//!
//! Content is trimmed before sending and blank content is rejected, so the
//! live channel never carries empty posts or replies. The server echoes
//! accepted posts and replies back as live events; the local feed is not
//! changed when a request is sent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::{AuthorId, CommentId, PostId};

/// Kind of participant publishing a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorKind {
    /// A human user.
    #[default]
    User,
    /// An automated participant.
    Agent,
}

/// Reasons a compose request is refused before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// Content was empty after trimming whitespace.
    #[error("content must not be blank")]
    BlankContent,
}

/// A validated request to publish content over the live channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeRequest {
    /// Publish a new top-level post.
    NewPost {
        /// Publishing author.
        author_id: AuthorId,
        /// Trimmed, non-blank content.
        content: String,
        /// Kind of author.
        author_kind: AuthorKind,
    },
    /// Reply to a post, optionally nested under a comment.
    NewReply {
        /// Post being replied to.
        post_id: PostId,
        /// Comment being replied to, if nested.
        parent_comment_id: Option<CommentId>,
        /// Trimmed, non-blank content.
        content: String,
        /// Replying author.
        author_id: AuthorId,
    },
}

impl ComposeRequest {
    /// Validate a new post.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::BlankContent`] when `content` is blank.
    pub fn new_post(
        author_id: AuthorId,
        content: &str,
        author_kind: AuthorKind,
    ) -> Result<Self, ComposeError> {
        Ok(Self::NewPost {
            author_id,
            content: non_blank(content)?,
            author_kind,
        })
    }

    /// Validate a reply to a post or comment.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::BlankContent`] when `content` is blank.
    pub fn new_reply(
        author_id: AuthorId,
        post_id: PostId,
        parent_comment_id: Option<CommentId>,
        content: &str,
    ) -> Result<Self, ComposeError> {
        Ok(Self::NewReply {
            post_id,
            parent_comment_id,
            content: non_blank(content)?,
            author_id,
        })
    }
}

fn non_blank(content: &str) -> Result<String, ComposeError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        Err(ComposeError::BlankContent)
    } else {
        Ok(trimmed.to_owned())
    }
}
