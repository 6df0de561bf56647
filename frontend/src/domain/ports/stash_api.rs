//! Driven port for the Stash REST backend.
//!
//! Handlers talk to the backend only through [`StashApi`]. A fresh client is
//! bound to one bearer token per request via [`StashApiFactory`], so the
//! credential never outlives the request that validated it.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{
    AuthResponse, BearerToken, Category, CategoryDraft, CategoryId, Link, LinkActivity, LinkId,
    LinkUpdate, LoginCredentials, NewLink, PasswordChange, ProfileUpdate, UserId, UserRecord,
};

/// Message used when the backend error body carries none.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Non-success HTTP response from the backend.
///
/// `data` holds the parsed JSON error body when it parsed; `message` is the
/// body's non-empty `message` field, else the call's fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// Parsed error body, if it was valid JSON.
    pub data: Option<Value>,
}

impl ApiError {
    /// Build an error from a raw response body.
    ///
    /// # Examples
    /// ```
    /// use frontend::domain::ports::ApiError;
    ///
    /// let err = ApiError::from_body(400, Some(br#"{"message":"bad url"}"#), "fallback");
    /// assert_eq!(err.message, "bad url");
    ///
    /// let err = ApiError::from_body(500, Some(b"<html>"), "fallback");
    /// assert_eq!((err.message.as_str(), err.data), ("fallback", None));
    /// ```
    #[must_use]
    pub fn from_body(status: u16, body: Option<&[u8]>, fallback: &str) -> Self {
        let data = body.and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok());
        let message = data
            .as_ref()
            .and_then(message_field)
            .unwrap_or(fallback)
            .to_owned();
        Self {
            status,
            message,
            data,
        }
    }

    /// Whether the backend rejected the credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

fn message_field(value: &Value) -> Option<&str> {
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
}

define_port_error! {
    /// Failures surfaced by [`StashApi`] calls.
    pub enum BackendError {
        /// The backend answered with a non-success status.
        Api { error: ApiError } => "backend rejected request: {error}",
        /// The request never produced a response.
        Transport { message: String } => "backend transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } => "backend request timed out: {message}",
        /// A success response body did not match the expected shape.
        Decode { status: u16, message: String } =>
            "backend response (status {status}) could not be decoded: {message}",
        /// The request payload could not be serialised.
        Encode { message: String } => "request body could not be encoded: {message}",
    }
}

impl BackendError {
    /// HTTP status carried by the failure, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { error } => Some(error.status),
            Self::Decode { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Timeout { .. } | Self::Encode { .. } => None,
        }
    }

    /// Typed backend error, if this is one.
    #[must_use]
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api { error } => Some(error),
            _ => None,
        }
    }
}

impl From<ApiError> for BackendError {
    fn from(error: ApiError) -> Self {
        Self::Api { error }
    }
}

/// Typed operations offered by the Stash backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StashApi: Send + Sync {
    /// `POST /users/login`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, BackendError>;

    /// `POST /users/register`.
    async fn register(&self, credentials: &LoginCredentials)
    -> Result<AuthResponse, BackendError>;

    /// `GET /users/{id}`.
    async fn get_user(&self, id: UserId) -> Result<UserRecord, BackendError>;

    /// `PATCH /users/{id}`.
    async fn update_user(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<UserRecord, BackendError>;

    /// `PATCH /users/password`.
    async fn change_password(&self, change: &PasswordChange) -> Result<(), BackendError>;

    /// `DELETE /users/{id}`.
    async fn delete_user(&self, id: UserId) -> Result<(), BackendError>;

    /// `GET /users/{id}/activity`.
    async fn user_activity(&self, id: UserId) -> Result<LinkActivity, BackendError>;

    /// `GET /links`.
    async fn list_links(&self) -> Result<Vec<Link>, BackendError>;

    /// `GET /links/{id}`.
    async fn get_link(&self, id: LinkId) -> Result<Link, BackendError>;

    /// `POST /links/save`.
    async fn save_link(&self, link: &NewLink) -> Result<Link, BackendError>;

    /// `PATCH /links/{id}/read`.
    async fn mark_read(&self, id: LinkId) -> Result<(), BackendError>;

    /// `PATCH /links/{id}`.
    async fn update_link(&self, id: LinkId, update: &LinkUpdate) -> Result<Link, BackendError>;

    /// `PATCH /links/{id}/summarize`.
    async fn summarize_link(&self, id: LinkId) -> Result<Link, BackendError>;

    /// `DELETE /links/{id}`.
    async fn delete_link(&self, id: LinkId) -> Result<(), BackendError>;

    /// `GET /categories`.
    async fn list_categories(&self) -> Result<Vec<Category>, BackendError>;

    /// `POST /categories`.
    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, BackendError>;

    /// `PATCH /categories/{id}`.
    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, BackendError>;

    /// `DELETE /categories/{id}`.
    async fn delete_category(&self, id: CategoryId) -> Result<(), BackendError>;
}

/// Builds [`StashApi`] clients bound to a bearer token.
#[cfg_attr(test, mockall::automock)]
pub trait StashApiFactory: Send + Sync {
    /// Client presenting `token` as `Bearer <token>`.
    fn client(&self, token: &BearerToken) -> Box<dyn StashApi>;
}
