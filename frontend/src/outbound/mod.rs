//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **stash_api**: reqwest-backed client for the Stash REST backend.
//!
//! Adapters translate between domain types and wire representations. They
//! contain no page logic and never touch the session.

pub mod stash_api;

pub use stash_api::{ApiClient, ApiRequest, ReqwestStashApiFactory};
