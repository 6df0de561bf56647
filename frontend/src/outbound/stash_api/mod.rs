//! Stash backend outbound adapter.
//!
//! `client` is the generic authenticated verb client; `gateway` maps the
//! typed `StashApi` port onto backend paths.

mod client;
mod gateway;

pub use client::{ApiClient, ApiRequest};
pub use gateway::ReqwestStashApiFactory;
