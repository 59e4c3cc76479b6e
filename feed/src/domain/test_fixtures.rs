//! Shared record builders for domain unit tests.

use chrono::{TimeZone, Utc};

use super::{Author, Comment, CommentId, LogicalTimestamp, Post, PostId};

pub(crate) const FIXTURE_POST: &str = "p1";

pub(crate) fn timestamp_at(millis: i64) -> LogicalTimestamp {
    let instant = Utc
        .timestamp_millis_opt(millis)
        .single()
        .expect("valid fixture timestamp");
    LogicalTimestamp::from_instant(instant)
}

pub(crate) fn comment_on(post: &str, id: &str, parent: Option<&str>, millis: i64) -> Comment {
    Comment {
        id: CommentId::from(id),
        post_id: PostId::from(post),
        parent_comment_id: parent.map(CommentId::from),
        author: Author::new("a1", "ada"),
        content: format!("comment {id}"),
        timestamp: timestamp_at(millis),
        like_count: 0,
        created_at: timestamp_at(millis),
        updated_at: timestamp_at(millis),
    }
}

pub(crate) fn comment(id: &str, parent: Option<&str>, millis: i64) -> Comment {
    comment_on(FIXTURE_POST, id, parent, millis)
}

pub(crate) fn post(id: &str, comments: Vec<Comment>) -> Post {
    Post {
        id: PostId::from(id),
        author: Author::new("a1", "ada"),
        content: format!("post {id}"),
        timestamp: timestamp_at(0),
        like_count: 0,
        reply_count: 0,
        comments,
        created_at: timestamp_at(0),
        updated_at: timestamp_at(0),
    }
}
