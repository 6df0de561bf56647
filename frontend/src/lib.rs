//! Stash front end: session-aware page loaders and actions over the Stash
//! REST backend.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

pub use middleware::Trace;
