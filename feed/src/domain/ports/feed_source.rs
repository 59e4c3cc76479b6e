//! Driven port for loading the initial feed.
//!
//! The feed runtime calls this once per session; adapters own the transport
//! and decoding details and surface failures as [`FeedSourceError`].

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Post;

define_port_error! {
    /// Errors raised while fetching the initial feed.
    pub enum FeedSourceError {
        /// The request could not be sent or the connection failed.
        Transport { message: String } => "feed transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } => "feed request timed out: {message}",
        /// The server answered with a non-success status.
        Rejected { status: u16, message: String } => "feed request rejected with status {status}: {message}",
        /// The response body was not a valid feed.
        Decode { message: String } => "feed response could not be decoded: {message}",
        /// The server reported the request as unsuccessful.
        Unsuccessful => "feed response reported failure",
    }
}

/// Source of the complete post list used to seed the feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch every post, most recent first, with its flat comment list.
    async fn fetch_posts(&self) -> Result<Vec<Post>, FeedSourceError>;
}

/// Fixture source serving a fixed post list.
#[derive(Debug, Default, Clone)]
pub struct FixtureFeedSource {
    posts: Vec<Post>,
}

impl FixtureFeedSource {
    /// Serve `posts` on every fetch.
    #[must_use]
    pub const fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl FeedSource for FixtureFeedSource {
    async fn fetch_posts(&self) -> Result<Vec<Post>, FeedSourceError> {
        Ok(self.posts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::post;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_source_serves_its_posts() {
        let source = FixtureFeedSource::new(vec![post("p1", Vec::new())]);
        let posts = source.fetch_posts().await.expect("posts");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts.first().expect("post").id.as_str(), "p1");
    }

    #[rstest]
    fn rejected_error_reports_status() {
        let err = FeedSourceError::rejected(502_u16, "bad gateway");
        assert_eq!(
            err.to_string(),
            "feed request rejected with status 502: bad gateway"
        );
    }
}
