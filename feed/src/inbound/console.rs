//! Line-oriented console driver.
//!
//! Each stdin line is one command:
//!
//! - `like post <id>` / `like comment <id>` toggles a like
//! - `post <text>` publishes a post
//! - `reply <post-id>[/<comment-id>] <text>` replies to a post or comment
//! - `quit` ends the session

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::ports::{ComposePublishError, ComposePublisher, FeedClosedError};
use crate::domain::{
    AuthorId, AuthorKind, CommentId, ComposeError, ComposeRequest, FeedHandle, LikeTarget, PostId,
};

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Toggle a like.
    Like(LikeTarget),
    /// Publish a post with the given text.
    Post(String),
    /// Reply to a post, optionally under a comment.
    Reply {
        /// Post being replied to.
        post_id: PostId,
        /// Comment being replied to.
        parent_comment_id: Option<CommentId>,
        /// Reply text.
        content: String,
    },
    /// Stop reading commands.
    Quit,
}

/// Reasons a console line cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleParseError {
    /// The line was blank.
    #[error("empty command")]
    Empty,
    /// The first word is not a known command.
    #[error("unknown command `{0}`")]
    Unknown(String),
    /// A required argument is missing.
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Description of the missing argument.
        argument: &'static str,
    },
}

/// Parse one console line.
///
/// # Errors
///
/// Returns [`ConsoleParseError`] for blank lines, unknown commands, or missing
/// arguments.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, ConsoleParseError> {
    let trimmed = line.trim();
    let (word, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(word, rest)| (word, rest.trim()));

    match word {
        "" => Err(ConsoleParseError::Empty),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        "like" => parse_like(rest),
        "post" => Ok(ConsoleCommand::Post(rest.to_owned())),
        "reply" => parse_reply(rest),
        other => Err(ConsoleParseError::Unknown(other.to_owned())),
    }
}

fn parse_like(rest: &str) -> Result<ConsoleCommand, ConsoleParseError> {
    let missing = ConsoleParseError::MissingArgument {
        command: "like",
        argument: "`post <id>` or `comment <id>`",
    };
    let mut words = rest.split_whitespace();
    match (words.next(), words.next()) {
        (Some("post"), Some(id)) => Ok(ConsoleCommand::Like(LikeTarget::Post(PostId::from(id)))),
        (Some("comment"), Some(id)) => Ok(ConsoleCommand::Like(LikeTarget::Comment(
            CommentId::from(id),
        ))),
        _ => Err(missing),
    }
}

fn parse_reply(rest: &str) -> Result<ConsoleCommand, ConsoleParseError> {
    let (target, content) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(target, content)| (target, content.trim()));
    if target.is_empty() {
        return Err(ConsoleParseError::MissingArgument {
            command: "reply",
            argument: "a target `<post-id>[/<comment-id>]`",
        });
    }

    let (post_id, parent_comment_id) = match target.split_once('/') {
        Some((post, comment)) if !comment.is_empty() => {
            (PostId::from(post), Some(CommentId::from(comment)))
        }
        Some((post, _)) => (PostId::from(post), None),
        None => (PostId::from(target), None),
    };
    Ok(ConsoleCommand::Reply {
        post_id,
        parent_comment_id,
        content: content.to_owned(),
    })
}

/// Whether the driver should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFlow {
    /// Read the next command.
    Continue,
    /// Stop reading.
    Quit,
}

/// Failures while executing a console command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleCommandError {
    /// The feed session has ended.
    #[error(transparent)]
    FeedClosed(#[from] FeedClosedError),
    /// The compose request was invalid.
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// The compose request could not be sent.
    #[error(transparent)]
    Publish(#[from] ComposePublishError),
    /// No author id is configured for posting.
    #[error("set FEED_AUTHOR_ID to post or reply")]
    MissingAuthor,
}

/// Executes parsed commands against the feed and the live channel.
pub struct ConsoleDriver {
    feed: FeedHandle,
    publisher: Arc<dyn ComposePublisher>,
    author_id: Option<AuthorId>,
}

impl ConsoleDriver {
    /// Build a driver.
    pub fn new(
        feed: FeedHandle,
        publisher: Arc<dyn ComposePublisher>,
        author_id: Option<AuthorId>,
    ) -> Self {
        Self {
            feed,
            publisher,
            author_id,
        }
    }

    /// Execute one command.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleCommandError`] when the feed is closed, the content is
    /// blank, no author is configured, or the live channel is gone.
    pub async fn execute(
        &self,
        command: ConsoleCommand,
    ) -> Result<ConsoleFlow, ConsoleCommandError> {
        match command {
            ConsoleCommand::Quit => return Ok(ConsoleFlow::Quit),
            ConsoleCommand::Like(target) => self.feed.toggle_like(target)?,
            ConsoleCommand::Post(content) => {
                let request =
                    ComposeRequest::new_post(self.author()?, &content, AuthorKind::User)?;
                self.publisher.publish(request).await?;
            }
            ConsoleCommand::Reply {
                post_id,
                parent_comment_id,
                content,
            } => {
                let request = ComposeRequest::new_reply(
                    self.author()?,
                    post_id,
                    parent_comment_id,
                    &content,
                )?;
                self.publisher.publish(request).await?;
            }
        }
        debug!("console command accepted");
        Ok(ConsoleFlow::Continue)
    }

    fn author(&self) -> Result<AuthorId, ConsoleCommandError> {
        self.author_id
            .clone()
            .ok_or(ConsoleCommandError::MissingAuthor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureFeedSource, FixtureLikeGateway, MockComposePublisher};
    use crate::domain::{FeedRuntime, UserId};
    use rstest::rstest;

    #[rstest]
    #[case("quit", ConsoleCommand::Quit)]
    #[case("  like post p1 ", ConsoleCommand::Like(LikeTarget::Post(PostId::from("p1"))))]
    #[case("like comment c7", ConsoleCommand::Like(LikeTarget::Comment(CommentId::from("c7"))))]
    #[case("post hello there", ConsoleCommand::Post("hello there".to_owned()))]
    #[case(
        "reply p1 thanks",
        ConsoleCommand::Reply {
            post_id: PostId::from("p1"),
            parent_comment_id: None,
            content: "thanks".to_owned(),
        }
    )]
    #[case(
        "reply p1/c2 agreed, mostly",
        ConsoleCommand::Reply {
            post_id: PostId::from("p1"),
            parent_comment_id: Some(CommentId::from("c2")),
            content: "agreed, mostly".to_owned(),
        }
    )]
    fn parses_commands(#[case] line: &str, #[case] expected: ConsoleCommand) {
        assert_eq!(parse_command(line), Ok(expected));
    }

    #[rstest]
    #[case("", ConsoleParseError::Empty)]
    #[case("dance", ConsoleParseError::Unknown("dance".to_owned()))]
    #[case(
        "like reel r1",
        ConsoleParseError::MissingArgument {
            command: "like",
            argument: "`post <id>` or `comment <id>`",
        }
    )]
    #[case(
        "reply",
        ConsoleParseError::MissingArgument {
            command: "reply",
            argument: "a target `<post-id>[/<comment-id>]`",
        }
    )]
    fn rejects_bad_lines(#[case] line: &str, #[case] expected: ConsoleParseError) {
        assert_eq!(parse_command(line), Err(expected));
    }

    fn closed_feed() -> FeedHandle {
        let (_runtime, handle) = FeedRuntime::new(
            Arc::new(FixtureFeedSource::default()),
            Arc::new(FixtureLikeGateway),
            UserId::from("user"),
        );
        handle
    }

    #[rstest]
    #[tokio::test]
    async fn posts_are_published_with_the_configured_author() {
        let mut publisher = MockComposePublisher::new();
        publisher
            .expect_publish()
            .withf(|request| {
                matches!(
                    request,
                    ComposeRequest::NewPost { author_id, content, .. }
                        if author_id.as_str() == "a1" && content == "hi"
                )
            })
            .times(1)
            .returning(|_| Ok(()));
        let driver = ConsoleDriver::new(
            closed_feed(),
            Arc::new(publisher),
            Some(AuthorId::from("a1")),
        );

        let flow = driver
            .execute(ConsoleCommand::Post("  hi ".to_owned()))
            .await
            .expect("published");
        assert_eq!(flow, ConsoleFlow::Continue);
    }

    #[rstest]
    #[tokio::test]
    async fn composing_without_an_author_fails() {
        let driver = ConsoleDriver::new(closed_feed(), Arc::new(MockComposePublisher::new()), None);
        let error = driver
            .execute(ConsoleCommand::Post("hi".to_owned()))
            .await
            .expect_err("no author");
        assert_eq!(error, ConsoleCommandError::MissingAuthor);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_replies_are_not_published() {
        let driver = ConsoleDriver::new(
            closed_feed(),
            Arc::new(MockComposePublisher::new()),
            Some(AuthorId::from("a1")),
        );
        let error = driver
            .execute(ConsoleCommand::Reply {
                post_id: PostId::from("p1"),
                parent_comment_id: None,
                content: "   ".to_owned(),
            })
            .await
            .expect_err("blank reply");
        assert_eq!(error, ConsoleCommandError::Compose(ComposeError::BlankContent));
    }

    #[rstest]
    #[tokio::test]
    async fn likes_fail_once_the_feed_is_gone() {
        let driver = ConsoleDriver::new(
            closed_feed(),
            Arc::new(MockComposePublisher::new()),
            Some(AuthorId::from("a1")),
        );
        let error = driver
            .execute(ConsoleCommand::Like(LikeTarget::Post(PostId::from("p1"))))
            .await
            .expect_err("runtime dropped");
        assert_eq!(error, ConsoleCommandError::FeedClosed(FeedClosedError::Closed));
    }
}
