//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! [`ActixSessionStore`] adapts the actix cookie session to the domain
//! [`SessionStore`] port. [`SessionContext`] is the extractor handlers use:
//! it pairs the store with the configured [`SessionValidator`].

use actix_session::Session as ActixSession;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use super::error::PageError;
use super::state::HttpState;
use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{
    AuthenticatedSession, BearerToken, Error, Session, SessionGuard, SessionValidator, UserRecord,
};

/// [`SessionStore`] over an actix session.
#[derive(Clone)]
pub struct ActixSessionStore(ActixSession);

impl ActixSessionStore {
    /// Wrap an actix session.
    pub fn new(session: ActixSession) -> Self {
        Self(session)
    }
}

impl SessionStore for ActixSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        self.0
            .get::<String>(key)
            .map_err(|err| SessionStoreError::read(err.to_string()))
    }

    fn insert(&self, key: &str, value: String) -> Result<(), SessionStoreError> {
        self.0
            .insert(key, value)
            .map_err(|err| SessionStoreError::write(err.to_string()))
    }

    fn remove(&self, key: &str) {
        self.0.remove(key);
    }
}

/// Request-scoped session access for handlers.
#[derive(Clone)]
pub struct SessionContext {
    store: ActixSessionStore,
    validator: SessionValidator,
}

impl SessionContext {
    /// Pair `session` with `validator`.
    pub fn new(session: ActixSession, validator: SessionValidator) -> Self {
        Self {
            store: ActixSessionStore::new(session),
            validator,
        }
    }

    /// Strict validation; redirects to the login page when absent.
    pub fn require(&self) -> Result<AuthenticatedSession, PageError> {
        self.validator
            .validate_session(&self.store)
            .map_err(|_| PageError::login_required())
    }

    /// Lenient validation; anonymous when absent.
    #[must_use]
    pub fn check(&self) -> Session {
        self.validator.check_session(&self.store)
    }

    /// Store a freshly issued token and user.
    pub fn persist(&self, token: &BearerToken, user: &UserRecord) -> Result<(), Error> {
        self.validator
            .persist(&self.store, token, user)
            .map_err(|err| {
                error!(error = %err, "failed to persist session");
                Error::internal(format!("failed to persist session: {err}"))
            })
    }

    /// Log out.
    pub fn clear(&self) {
        self.validator.clear(&self.store);
    }

    /// 401 policy bound to this session.
    #[must_use]
    pub fn guard(&self) -> SessionGuard<'_, ActixSessionStore> {
        SessionGuard::new(&self.store, self.validator)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let validator = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| state.sessions)
            .unwrap_or_default();
        let fut = ActixSession::from_request(req, payload);
        Box::pin(async move { fut.await.map(|session| SessionContext::new(session, validator)) })
    }
}
