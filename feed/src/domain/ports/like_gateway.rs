//! Driven port for the remote like endpoints.
//!
//! Calls are fire-and-forget from the feed's point of view: the optimistic
//! state is already applied when an adapter is invoked, and the outcome is
//! only logged.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{LikeTarget, UserId};

define_port_error! {
    /// Errors raised by the remote like endpoints.
    pub enum LikeGatewayError {
        /// The request could not be sent or the connection failed.
        Transport { message: String } => "like transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } => "like request timed out: {message}",
        /// The server answered with a non-success status.
        Rejected { status: u16, message: String } => "like request rejected with status {status}: {message}",
    }
}

/// Remote like/unlike operations for the current user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeGateway: Send + Sync {
    /// Record a like on `target`.
    async fn add_like(&self, user_id: &UserId, target: &LikeTarget)
    -> Result<(), LikeGatewayError>;

    /// Withdraw a like from `target`.
    async fn remove_like(
        &self,
        user_id: &UserId,
        target: &LikeTarget,
    ) -> Result<(), LikeGatewayError>;
}

/// Gateway that accepts every call without contacting a server.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLikeGateway;

#[async_trait]
impl LikeGateway for FixtureLikeGateway {
    async fn add_like(
        &self,
        _user_id: &UserId,
        _target: &LikeTarget,
    ) -> Result<(), LikeGatewayError> {
        Ok(())
    }

    async fn remove_like(
        &self,
        _user_id: &UserId,
        _target: &LikeTarget,
    ) -> Result<(), LikeGatewayError> {
        Ok(())
    }
}
