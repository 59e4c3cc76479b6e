//! Wire-level message definitions for the live-update channel.
//!
//! Inbound frames are JSON objects tagged by `type`. They are decoded in two
//! steps: first to a generic value to read the tag, then into the typed
//! payload. Unknown tags are reported separately from malformed payloads so
//! the dispatcher can ignore the former quietly and warn about the latter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    AuthorId, AuthorKind, Comment, CommentId, ComposeRequest, FeedEvent, Post, PostId,
};

/// Result of decoding one inbound text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveUpdate {
    /// A recognised event for the feed.
    Event(FeedEvent),
    /// A well-formed message with a type the feed does not handle.
    Ignored(String),
}

/// Reasons an inbound frame cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiveMessageError {
    /// The frame is not a JSON object.
    #[error("live message is not a JSON object: {message}")]
    InvalidJson {
        /// Parser diagnostic.
        message: String,
    },
    /// The object has no string `type` field.
    #[error("live message has no type")]
    MissingType,
    /// A recognised type carried an invalid payload.
    #[error("invalid {kind} message: {message}")]
    Malformed {
        /// Message type.
        kind: String,
        /// Decoder diagnostic.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct PostMessage {
    post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentMessage {
    post_id: PostId,
    comment: Comment,
}

/// Decode one inbound text frame.
///
/// # Errors
///
/// Returns [`LiveMessageError`] when the frame is not a tagged JSON object or
/// a recognised type carries an invalid payload.
///
/// # Examples
/// ```
/// use feed::inbound::ws::messages::{decode_live_update, LiveUpdate};
///
/// let update = decode_live_update(r#"{"type":"typing","userId":"u1"}"#).unwrap();
/// assert_eq!(update, LiveUpdate::Ignored("typing".to_owned()));
/// ```
pub fn decode_live_update(text: &str) -> Result<LiveUpdate, LiveMessageError> {
    let value: Value = serde_json::from_str(text).map_err(|error| LiveMessageError::InvalidJson {
        message: error.to_string(),
    })?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(LiveMessageError::MissingType)?
        .to_owned();

    match kind.as_str() {
        "post" => {
            let message: PostMessage = decode_payload(&kind, value)?;
            Ok(LiveUpdate::Event(FeedEvent::PostPublished(message.post)))
        }
        "comment" => {
            let CommentMessage {
                post_id,
                mut comment,
            } = decode_payload(&kind, value)?;
            if comment.post_id.as_str().is_empty() {
                comment.post_id = post_id.clone();
            }
            Ok(LiveUpdate::Event(FeedEvent::CommentPublished {
                post_id,
                comment,
            }))
        }
        _ => Ok(LiveUpdate::Ignored(kind)),
    }
}

fn decode_payload<T: for<'de> Deserialize<'de>>(
    kind: &str,
    value: Value,
) -> Result<T, LiveMessageError> {
    serde_json::from_value(value).map_err(|error| LiveMessageError::Malformed {
        kind: kind.to_owned(),
        message: error.to_string(),
    })
}

/// Outbound payload sent over the live channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Publish a top-level post.
    NewPost {
        /// Publishing author.
        author_id: AuthorId,
        /// Post content.
        content: String,
        /// Kind of author.
        author_type: AuthorKind,
    },
    /// Reply to a post or comment.
    NewReply {
        /// Post being replied to.
        post_id: PostId,
        /// Comment being replied to, if nested.
        #[serde(skip_serializing_if = "Option::is_none")]
        parent_reply_id: Option<CommentId>,
        /// Reply content.
        content: String,
        /// Replying author.
        author_id: AuthorId,
    },
}

impl From<ComposeRequest> for ClientMessage {
    fn from(value: ComposeRequest) -> Self {
        match value {
            ComposeRequest::NewPost {
                author_id,
                content,
                author_kind,
            } => Self::NewPost {
                author_id,
                content,
                author_type: author_kind,
            },
            ComposeRequest::NewReply {
                post_id,
                parent_comment_id,
                content,
                author_id,
            } => Self::NewReply {
                post_id,
                parent_reply_id: parent_comment_id,
                content,
                author_id,
            },
        }
    }
}
