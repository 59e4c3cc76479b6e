//! Threaded social feed synchronisation engine.
//!
//! Flat, parent-referencing comment lists are turned into ordered threads,
//! kept current by a WebSocket live-update channel, and mutated by
//! optimistic likes whose remote calls never block the feed.
//!
//! Layout follows a hexagonal split: [`domain`] holds the engine and its
//! ports, [`inbound`] drives it (WebSocket, console), and [`outbound`]
//! implements the REST ports with reqwest.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::TraceId;
