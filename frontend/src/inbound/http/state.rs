//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they depend only on
//! domain ports and stay testable without a live backend.

use std::sync::Arc;

use crate::domain::SessionValidator;
use crate::domain::ports::{StashApi, StashApiFactory};
use crate::domain::BearerToken;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Builds backend clients per request.
    pub api: Arc<dyn StashApiFactory>,
    /// Session key names and validation rules.
    pub sessions: SessionValidator,
}

impl HttpState {
    /// State using the default session keys.
    pub fn new(api: Arc<dyn StashApiFactory>) -> Self {
        Self {
            api,
            sessions: SessionValidator::default(),
        }
    }

    /// Override the session validator.
    #[must_use]
    pub fn with_sessions(mut self, sessions: SessionValidator) -> Self {
        self.sessions = sessions;
        self
    }

    /// Client presenting `token`.
    #[must_use]
    pub fn client(&self, token: &BearerToken) -> Box<dyn StashApi> {
        self.api.client(token)
    }

    /// Client sending no credential, for login and registration.
    #[must_use]
    pub fn anonymous_client(&self) -> Box<dyn StashApi> {
        self.api.client(&BearerToken::empty())
    }
}
