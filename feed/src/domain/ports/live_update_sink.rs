//! Driving port through which live adapters hand decoded events to the feed.

use super::define_port_error;
use crate::domain::FeedEvent;

define_port_error! {
    /// Raised when the feed no longer accepts events.
    pub enum FeedClosedError {
        /// The feed session has been torn down.
        Closed => "feed session is closed",
    }
}

/// Accepts live events for application in arrival order.
///
/// Delivery only enqueues the event; it never blocks on feed state.
#[cfg_attr(test, mockall::automock)]
pub trait LiveUpdateSink: Send + Sync {
    /// Queue `event` for the feed.
    ///
    /// # Errors
    ///
    /// Returns [`FeedClosedError::Closed`] once the session has ended.
    fn deliver(&self, event: FeedEvent) -> Result<(), FeedClosedError>;
}
