//! Login, registration, and logout actions.
//!
//! ```text
//! POST /login    email=a@b.com&password=x  -> 303 /stash
//! POST /register email=a@b.com&password=x  -> 303 /stash
//! POST /logout                             -> 303 /
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::{PageError, see_other};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::ports::BackendError;
use crate::domain::{AuthResponse, Error, LoginCredentials};

/// Landing page after a successful login or registration.
pub const STASH_PATH: &str = "/stash";
/// Landing page after logout or account deletion.
pub const HOME_PATH: &str = "/";

const CREDENTIALS_REQUIRED: &str = "Email and password are required";

/// Form body shared by `POST /login` and `POST /register`.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    fn into_credentials(self) -> Result<LoginCredentials, Error> {
        let (Some(email), Some(password)) = (self.email, self.password) else {
            return Err(Error::invalid_request(CREDENTIALS_REQUIRED));
        };
        LoginCredentials::try_from_parts(&email, &password)
            .map_err(|_| Error::invalid_request(CREDENTIALS_REQUIRED))
    }
}

/// Authenticate against the backend and start a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> Result<HttpResponse, PageError> {
    let credentials = form.into_inner().into_credentials()?;
    let response = state
        .anonymous_client()
        .login(&credentials)
        .await
        .map_err(|err| rejected("login", err))?;
    establish(&session, &response)
}

/// Create an account and start a session.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> Result<HttpResponse, PageError> {
    let credentials = form.into_inner().into_credentials()?;
    let response = state
        .anonymous_client()
        .register(&credentials)
        .await
        .map_err(|err| rejected("registration", err))?;
    establish(&session, &response)
}

/// End the session.
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    see_other(HOME_PATH)
}

fn establish(session: &SessionContext, response: &AuthResponse) -> Result<HttpResponse, PageError> {
    session.persist(&response.token.access_token, &response.user)?;
    info!(user_id = %response.user.id, "session established");
    Ok(see_other(STASH_PATH))
}

// No session exists yet, so a 401 here is a bad password, not an expiry.
fn rejected(action: &'static str, err: BackendError) -> PageError {
    warn!(action, kind = err.kind(), status = err.status(), error = %err, "authentication failed");
    match err {
        BackendError::Api { error } => PageError::form(error.status, error.message),
        other => PageError::Failure(Error::upstream(format!("{action} failed: {other}"))),
    }
}
