//! Driven port for sending new posts and replies over the live channel.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::ComposeRequest;

define_port_error! {
    /// Errors raised while handing a compose request to the live channel.
    pub enum ComposePublishError {
        /// The live channel is not connected.
        Disconnected => "live channel is not connected",
    }
}

/// Publishes validated compose requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComposePublisher: Send + Sync {
    /// Queue `request` for sending.
    async fn publish(&self, request: ComposeRequest) -> Result<(), ComposePublishError>;
}
