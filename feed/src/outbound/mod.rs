//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed feed fetch and like toggle endpoints.
//!
//! Adapters are thin translators between domain types and wire formats. They
//! contain no feed logic.

pub mod http;
