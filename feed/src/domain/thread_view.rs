//! Render snapshots into display-ready threads.
//!
//! Each render re-derives the comment forest from the flat lists, sorts it,
//! and walks it depth-first. Nothing is cached between renders, so a view is
//! always consistent with the snapshot it came from.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

use super::comment_tree::CommentForest;
use super::feed_session::FeedSnapshot;
use super::ids::{CommentId, PostId};
use super::indent::IndentCurve;
use super::likes::LikedSet;
use super::post::{Author, Post};
use super::relative_time::relative_age;

/// One comment positioned in its thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadLine {
    /// Nesting depth; top-level comments are depth 0.
    pub depth: u32,
    /// Bounded visual offset for `depth`.
    pub indent: f64,
    /// Comment identifier.
    pub comment_id: CommentId,
    /// Author handle.
    pub author: String,
    /// Whether the author is an automated participant.
    pub automated: bool,
    /// Text content.
    pub content: String,
    /// Number of likes.
    pub like_count: u64,
    /// Whether the current user likes the comment.
    pub liked: bool,
    /// Relative age label.
    pub age: String,
}

/// One post with its rendered thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    /// Post identifier.
    pub post_id: PostId,
    /// Author handle.
    pub author: String,
    /// Whether the author is an automated participant.
    pub automated: bool,
    /// Text content.
    pub content: String,
    /// Number of likes.
    pub like_count: u64,
    /// Whether the current user likes the post.
    pub liked: bool,
    /// Relative age label.
    pub age: String,
    /// Number of comments in the flat list.
    pub comment_count: usize,
    /// Comments in depth-first display order.
    pub thread: Vec<ThreadLine>,
}

/// The rendered feed, most recent post first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedView {
    /// Rendered posts.
    pub posts: Vec<PostView>,
}

/// Turns feed snapshots into [`FeedView`]s.
pub struct ThreadRenderer {
    curve: IndentCurve,
    clock: Arc<dyn Clock>,
    automated_handles: BTreeSet<String>,
}

impl ThreadRenderer {
    /// Build a renderer.
    pub fn new(
        curve: IndentCurve,
        clock: Arc<dyn Clock>,
        automated_handles: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            curve,
            clock,
            automated_handles: automated_handles.into_iter().collect(),
        }
    }

    /// Whether `author` is one of the configured automated participants.
    #[must_use]
    pub fn is_automated(&self, author: &Author) -> bool {
        self.automated_handles.contains(&author.username)
    }

    /// Render every post in the snapshot.
    #[must_use]
    pub fn render(&self, snapshot: &FeedSnapshot) -> FeedView {
        let now = self.clock.utc();
        FeedView {
            posts: snapshot
                .posts
                .iter()
                .map(|post| self.render_post(post, &snapshot.liked, now))
                .collect(),
        }
    }

    fn render_post(&self, post: &Post, liked: &LikedSet, now: DateTime<Utc>) -> PostView {
        let forest = CommentForest::build(&post.comments).sorted_by_timestamp();
        let thread = forest
            .pre_order()
            .into_iter()
            .map(|entry| ThreadLine {
                depth: entry.depth,
                indent: self.curve.offset(entry.depth),
                comment_id: entry.comment.id.clone(),
                author: entry.comment.author.username.clone(),
                automated: self.is_automated(&entry.comment.author),
                content: entry.comment.content.clone(),
                like_count: entry.comment.like_count,
                liked: liked.contains_comment(&entry.comment.id),
                age: relative_age(&entry.comment.timestamp, now),
            })
            .collect();

        PostView {
            post_id: post.id.clone(),
            author: post.author.username.clone(),
            automated: self.is_automated(&post.author),
            content: post.content.clone(),
            like_count: post.like_count,
            liked: liked.contains_post(&post.id),
            age: relative_age(&post.timestamp, now),
            comment_count: post.comments.len(),
            thread,
        }
    }
}
