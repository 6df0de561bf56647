//! Uniform handling of backend failures for authenticated calls.
//!
//! Every authenticated call runs inside a [`SessionGuard`]. A 401 from the
//! backend means the stored credential is no longer valid, so the guard
//! clears the session before reporting [`CallFailure::SessionExpired`]. All
//! other failures are classified without touching the session.

use std::future::Future;

use serde_json::Value;
use tracing::warn;

use super::SessionValidator;
use super::ports::{BackendError, SessionStore};

/// Classified outcome of a failed backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallFailure {
    /// The backend rejected the credential; the session is already cleared.
    #[error("session expired")]
    SessionExpired,
    /// The backend refused the input (4xx other than 401 and 404).
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        data: Option<Value>,
    },
    /// The addressed resource does not exist.
    #[error("{message}")]
    NotFound { message: String },
    /// Transport failure, timeout, undecodable response, or 5xx.
    #[error("{message}")]
    Unavailable {
        status: Option<u16>,
        message: String,
    },
}

impl CallFailure {
    /// Classify a failure that did not carry a 401.
    ///
    /// A 401 is still mapped to [`CallFailure::SessionExpired`], but nothing
    /// is cleared; use [`SessionGuard`] for authenticated calls.
    #[must_use]
    pub fn classify(err: BackendError) -> Self {
        let status = err.status();
        match err {
            BackendError::Api { error } => match error.status {
                401 => Self::SessionExpired,
                404 => Self::NotFound {
                    message: error.message,
                },
                400..=499 => Self::Rejected {
                    status: error.status,
                    message: error.message,
                    data: error.data,
                },
                _ => Self::Unavailable {
                    status,
                    message: error.message,
                },
            },
            other => Self::Unavailable {
                status,
                message: other.to_string(),
            },
        }
    }
}

/// Applies the 401 policy around backend calls.
pub struct SessionGuard<'a, S: ?Sized> {
    store: &'a S,
    validator: SessionValidator,
}

impl<'a, S> SessionGuard<'a, S>
where
    S: SessionStore + ?Sized,
{
    /// Guard clearing `store` through `validator` on a 401.
    pub fn new(store: &'a S, validator: SessionValidator) -> Self {
        Self { store, validator }
    }

    /// Await `call`, classifying any failure.
    ///
    /// Independent calls may be combined with `try_join` before being
    /// passed in; the first failure wins and the others are dropped.
    pub async fn run<T, F>(&self, call: F) -> Result<T, CallFailure>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        call.await.map_err(|err| self.inspect(err))
    }

    /// Classify `err`, clearing the session when it is a 401.
    pub fn inspect(&self, err: BackendError) -> CallFailure {
        warn!(kind = err.kind(), status = err.status(), error = %err, "backend call failed");
        let failure = CallFailure::classify(err);
        if failure == CallFailure::SessionExpired {
            self.validator.clear(self.store);
        }
        failure
    }
}
