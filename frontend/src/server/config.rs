//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::SessionValidator;
use crate::domain::ports::StashApiFactory;
use crate::inbound::http::session_config::SessionSettings;

/// Everything [`super::create_server`] needs to build the app.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) api: Arc<dyn StashApiFactory>,
    pub(crate) sessions: SessionValidator,
}

impl ServerConfig {
    /// Configuration serving pages backed by `api`.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        api: Arc<dyn StashApiFactory>,
    ) -> Self {
        Self {
            session,
            bind_addr,
            api,
            sessions: SessionValidator::default(),
        }
    }

    /// Override the session key names.
    #[must_use]
    pub fn with_sessions(mut self, sessions: SessionValidator) -> Self {
        self.sessions = sessions;
        self
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
