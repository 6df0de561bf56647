//! [`StashApi`] over [`ApiClient`], plus the per-request client factory.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::IgnoredAny;

use super::client::{ApiClient, ApiRequest};
use crate::domain::ports::{BackendError, StashApi, StashApiFactory};
use crate::domain::{
    AuthResponse, BearerToken, Category, CategoryDraft, CategoryId, Link, LinkActivity, LinkId,
    LinkUpdate, LoginCredentials, NewLink, PasswordChange, ProfileUpdate, UserId, UserRecord,
};

const SAVE_LINK_FAILED: &str = "failed to save link";
const USER_AGENT: &str = concat!("stash-frontend/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a LoginCredentials> for CredentialsBody<'a> {
    fn from(credentials: &'a LoginCredentials) -> Self {
        Self {
            email: credentials.email(),
            password: credentials.password(),
        }
    }
}

#[async_trait]
impl StashApi for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, BackendError> {
        self.post("/users/login", Some(&CredentialsBody::from(credentials)))
            .await
    }

    async fn register(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthResponse, BackendError> {
        self.post("/users/register", Some(&CredentialsBody::from(credentials)))
            .await
    }

    async fn get_user(&self, id: UserId) -> Result<UserRecord, BackendError> {
        self.get(&format!("/users/{id}")).await
    }

    async fn update_user(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<UserRecord, BackendError> {
        self.patch(&format!("/users/{id}"), Some(update)).await
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<(), BackendError> {
        self.patch::<IgnoredAny, _>("/users/password", Some(change))
            .await
            .map(drop)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), BackendError> {
        self.delete::<IgnoredAny>(&format!("/users/{id}"))
            .await
            .map(drop)
    }

    async fn user_activity(&self, id: UserId) -> Result<LinkActivity, BackendError> {
        self.get(&format!("/users/{id}/activity")).await
    }

    async fn list_links(&self) -> Result<Vec<Link>, BackendError> {
        self.get("/links").await
    }

    async fn get_link(&self, id: LinkId) -> Result<Link, BackendError> {
        self.get(&format!("/links/{id}")).await
    }

    async fn save_link(&self, link: &NewLink) -> Result<Link, BackendError> {
        let request = ApiRequest::post("/links/save")
            .with_json(link)?
            .with_fallback_message(SAVE_LINK_FAILED);
        self.send(request).await
    }

    async fn mark_read(&self, id: LinkId) -> Result<(), BackendError> {
        self.send::<IgnoredAny>(ApiRequest::patch(format!("/links/{id}/read")))
            .await
            .map(drop)
    }

    async fn update_link(&self, id: LinkId, update: &LinkUpdate) -> Result<Link, BackendError> {
        self.patch(&format!("/links/{id}"), Some(update)).await
    }

    async fn summarize_link(&self, id: LinkId) -> Result<Link, BackendError> {
        self.send(ApiRequest::patch(format!("/links/{id}/summarize")))
            .await
    }

    async fn delete_link(&self, id: LinkId) -> Result<(), BackendError> {
        self.delete::<IgnoredAny>(&format!("/links/{id}"))
            .await
            .map(drop)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.get("/categories").await
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, BackendError> {
        self.post("/categories", Some(draft)).await
    }

    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, BackendError> {
        self.patch(&format!("/categories/{id}"), Some(draft)).await
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), BackendError> {
        self.delete::<IgnoredAny>(&format!("/categories/{id}"))
            .await
            .map(drop)
    }
}

/// Builds [`ApiClient`]s sharing one connection pool and base URL.
#[derive(Clone)]
pub struct ReqwestStashApiFactory {
    http: Client,
    base_url: String,
}

impl ReqwestStashApiFactory {
    /// Factory for `base_url`, optionally bounding every request by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.to_owned(),
        })
    }
}

impl StashApiFactory for ReqwestStashApiFactory {
    fn client(&self, token: &BearerToken) -> Box<dyn StashApi> {
        Box::new(ApiClient::new(
            self.http.clone(),
            &self.base_url,
            token.clone(),
        ))
    }
}
