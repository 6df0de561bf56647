//! Session validation over a [`SessionStore`].
//!
//! A session is the pair (bearer token, cached user record) stored under two
//! keys. Both are written together and cleared together; any state where one
//! is missing or the user record does not parse is treated as "logged out"
//! and scrubbed on the spot.
//!
//! [`SessionValidator::validate_session`] is the strict mode used by
//! protected pages. [`SessionValidator::check_session`] is the lenient mode
//! used by public pages that only want to know who is logged in. Both share
//! one validity check and differ only in how failure is reported.

use std::fmt;

use tracing::debug;

use super::ports::{SessionStore, SessionStoreError};
use super::{BearerToken, UserRecord};

/// Session key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionKeys {
    /// Key holding the raw bearer token.
    pub token: &'static str,
    /// Key holding the JSON-encoded [`UserRecord`].
    pub user: &'static str,
}

impl SessionKeys {
    /// Key names shared by every page.
    pub const DEFAULT: Self = Self {
        token: "stash_token",
        user: "stash_user",
    };
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Why a stored session was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRequiredReason {
    /// No token, or a blank one.
    MissingToken,
    /// Token present but no user record.
    MissingUser,
    /// User record present but not valid JSON for [`UserRecord`].
    MalformedUser,
    /// The store failed to return a value.
    Unreadable,
}

impl LoginRequiredReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::MissingUser => "missing_user",
            Self::MalformedUser => "malformed_user",
            Self::Unreadable => "unreadable",
        }
    }
}

impl fmt::Display for LoginRequiredReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The caller must log in again.
    #[error("login required ({reason})")]
    LoginRequired {
        /// What was wrong with the stored session.
        reason: LoginRequiredReason,
    },
}

/// A token together with the user it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedSession {
    token: BearerToken,
    user: UserRecord,
}

impl AuthenticatedSession {
    /// Pair a token with its user.
    #[must_use]
    pub fn new(token: BearerToken, user: UserRecord) -> Self {
        Self { token, user }
    }

    /// Bearer credential.
    #[must_use]
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Cached user record.
    #[must_use]
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// Split into its parts.
    #[must_use]
    pub fn into_parts(self) -> (BearerToken, UserRecord) {
        (self.token, self.user)
    }
}

/// Result of lenient validation: authenticated or anonymous.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session(Option<AuthenticatedSession>);

impl Session {
    /// The logged-out session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// Whether no one is logged in.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }

    /// Token, when authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&BearerToken> {
        self.0.as_ref().map(AuthenticatedSession::token)
    }

    /// User, when authenticated.
    #[must_use]
    pub fn user(&self) -> Option<&UserRecord> {
        self.0.as_ref().map(AuthenticatedSession::user)
    }

    /// Authenticated part, if any.
    #[must_use]
    pub fn into_authenticated(self) -> Option<AuthenticatedSession> {
        self.0
    }
}

impl From<AuthenticatedSession> for Session {
    fn from(value: AuthenticatedSession) -> Self {
        Self(Some(value))
    }
}

/// Reads, writes, and scrubs the session key pair.
///
/// # Examples
/// ```
/// use frontend::domain::ports::MemorySessionStore;
/// use frontend::domain::{BearerToken, SessionValidator, UserId, UserRecord};
///
/// let store = MemorySessionStore::new();
/// let validator = SessionValidator::default();
/// assert!(validator.check_session(&store).is_anonymous());
///
/// let user = UserRecord::new(UserId::new(1), "a@b.com");
/// validator.persist(&store, &BearerToken::new("T1"), &user).unwrap();
/// let session = validator.validate_session(&store).unwrap();
/// assert_eq!(session.token().as_str(), "T1");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionValidator {
    keys: SessionKeys,
}

impl SessionValidator {
    /// Validator using custom key names.
    #[must_use]
    pub const fn new(keys: SessionKeys) -> Self {
        Self { keys }
    }

    /// Key names in use.
    #[must_use]
    pub const fn keys(&self) -> SessionKeys {
        self.keys
    }

    /// Strict mode: the authenticated session, or `LoginRequired`.
    ///
    /// On failure both keys are cleared before returning.
    pub fn validate_session<S>(&self, store: &S) -> Result<AuthenticatedSession, SessionError>
    where
        S: SessionStore + ?Sized,
    {
        self.read(store).map_err(|reason| {
            self.reject(store, reason);
            SessionError::LoginRequired { reason }
        })
    }

    /// Lenient mode: the authenticated session, or anonymous.
    ///
    /// On failure both keys are cleared before returning.
    pub fn check_session<S>(&self, store: &S) -> Session
    where
        S: SessionStore + ?Sized,
    {
        match self.read(store) {
            Ok(session) => session.into(),
            Err(reason) => {
                self.reject(store, reason);
                Session::anonymous()
            }
        }
    }

    /// Store `token` and `user` together.
    ///
    /// If either write fails, both keys are removed so no half-populated
    /// session survives.
    pub fn persist<S>(
        &self,
        store: &S,
        token: &BearerToken,
        user: &UserRecord,
    ) -> Result<(), SessionStoreError>
    where
        S: SessionStore + ?Sized,
    {
        let written = serde_json::to_string(user)
            .map_err(|err| SessionStoreError::write(err.to_string()))
            .and_then(|encoded| {
                store.insert(self.keys.token, token.as_str().to_owned())?;
                store.insert(self.keys.user, encoded)
            });
        if written.is_err() {
            self.clear(store);
        }
        written
    }

    /// Remove both keys. Idempotent.
    pub fn clear<S>(&self, store: &S)
    where
        S: SessionStore + ?Sized,
    {
        store.remove(self.keys.token);
        store.remove(self.keys.user);
    }

    fn read<S>(&self, store: &S) -> Result<AuthenticatedSession, LoginRequiredReason>
    where
        S: SessionStore + ?Sized,
    {
        let token = store
            .get(self.keys.token)
            .map_err(|_| LoginRequiredReason::Unreadable)?
            .map(BearerToken::new)
            .filter(|token| !token.is_empty())
            .ok_or(LoginRequiredReason::MissingToken)?;
        let raw_user = store
            .get(self.keys.user)
            .map_err(|_| LoginRequiredReason::Unreadable)?
            .ok_or(LoginRequiredReason::MissingUser)?;
        let user = serde_json::from_str::<UserRecord>(&raw_user)
            .map_err(|_| LoginRequiredReason::MalformedUser)?;
        Ok(AuthenticatedSession::new(token, user))
    }

    fn reject<S>(&self, store: &S, reason: LoginRequiredReason)
    where
        S: SessionStore + ?Sized,
    {
        debug!(%reason, "clearing invalid session");
        self.clear(store);
    }
}
