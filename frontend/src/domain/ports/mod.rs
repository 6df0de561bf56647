//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod session_store;
mod stash_api;

#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{MemorySessionStore, SessionStore, SessionStoreError};
#[cfg(test)]
pub use stash_api::{MockStashApi, MockStashApiFactory};
pub use stash_api::{
    ApiError, BackendError, DEFAULT_ERROR_MESSAGE, StashApi, StashApiFactory,
};
