//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod compose_publisher;
mod feed_source;
mod like_gateway;
mod live_update_sink;

#[cfg(test)]
pub use compose_publisher::MockComposePublisher;
pub use compose_publisher::{ComposePublishError, ComposePublisher};
#[cfg(test)]
pub use feed_source::MockFeedSource;
pub use feed_source::{FeedSource, FeedSourceError, FixtureFeedSource};
#[cfg(test)]
pub use like_gateway::MockLikeGateway;
pub use like_gateway::{FixtureLikeGateway, LikeGateway, LikeGatewayError};
#[cfg(test)]
pub use live_update_sink::MockLiveUpdateSink;
pub use live_update_sink::{FeedClosedError, LiveUpdateSink};
