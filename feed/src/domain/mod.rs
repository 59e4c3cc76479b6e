//! Domain primitives, the threaded-comment engine, and feed state.
//!
//! Purpose: turn flat, parent-referencing comment lists into ordered threads,
//! keep feed state consistent while live events and optimistic likes arrive,
//! and expose ports so adapters never leak transport details inward.
//!
//! Public surface:
//! - Records: `Post`, `Comment`, `Author`, the id newtypes and
//!   `LogicalTimestamp`.
//! - Threading: `CommentForest` (build, sort, pre-order walk), `IndentCurve`,
//!   `ThreadRenderer` and its view types.
//! - State: `FeedStore`, `LikeCoordinator`, `FeedSession`, `FeedRuntime`.
//! - Ports: see [`ports`].

mod comment_tree;
mod compose;
mod feed_events;
mod feed_runtime;
mod feed_session;
mod feed_store;
mod ids;
mod indent;
mod likes;
mod post;
mod relative_time;
mod sort_policy;
mod thread_view;
mod timestamp;
mod trace_id;

pub mod ports;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::comment_tree::{CommentForest, CommentNode, DepthEntry};
pub use self::compose::{AuthorKind, ComposeError, ComposeRequest};
pub use self::feed_events::FeedEvent;
pub use self::feed_runtime::{FeedHandle, FeedRuntime};
pub use self::feed_session::{FeedInput, FeedSession, FeedSnapshot, FeedStep};
pub use self::feed_store::FeedStore;
pub use self::ids::{AuthorId, CommentId, PostId, UserId};
pub use self::indent::{DEFAULT_CURVE, DEFAULT_MAX_OFFSET, IndentCurve};
pub use self::likes::{
    LikeAction, LikeCommand, LikeCoordinator, LikeDirection, LikeTarget, LikedSet, TargetKind,
};
pub use self::post::{Author, Comment, Post};
pub use self::relative_time::relative_age;
pub use self::thread_view::{FeedView, PostView, ThreadLine, ThreadRenderer};
pub use self::timestamp::LogicalTimestamp;
pub use self::trace_id::TraceId;
