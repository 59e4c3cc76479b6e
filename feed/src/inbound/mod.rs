//! Inbound adapters driving the feed.
//!
//! - **ws**: the live-update WebSocket client and its dispatcher
//! - **console**: stdin commands for likes, posts, and replies

pub mod console;
pub mod ws;
