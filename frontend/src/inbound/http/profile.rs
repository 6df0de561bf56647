//! Profile page: account details, preferences, password, and deletion.
//!
//! Actions answer `{ "success": true, ... }` or `{ "success": false,
//! "error": "..." }` so the page can render the outcome next to the form.
//! An expired credential still clears the session and redirects.

use actix_web::{HttpResponse, get, post, web};
use futures_util::future::try_join;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::HOME_PATH;
use super::error::{CallSite, PageError, see_other};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{
    CallFailure, Error, LinkActivity, NEWSLETTER_FREQUENCY_WEEKLY, PasswordChange, ProfileUpdate,
    ProfileValidationError, UserRecord, confirm_account_deletion,
};

const LOAD_FAILED: &str = "Failed to load profile data";
const UPDATE: CallSite = CallSite::new("Failed to update profile");
const PASSWORD: CallSite = CallSite::new("Failed to change password");
const DELETE: CallSite = CallSite::new("Failed to delete account");

#[derive(Serialize)]
struct ProfilePage {
    user: UserRecord,
    activity: LinkActivity,
    total_links: u64,
}

#[derive(Serialize)]
struct ActionResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ActionResult {
    fn ok(user: Option<UserRecord>) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            user,
            error: None,
        })
    }

    fn failed(error: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: false,
            user: None,
            error: Some(error.into()),
        })
    }
}

/// Backend refusals are reported inline; everything else leaves the page.
fn action_failure(site: CallSite, failure: CallFailure) -> Result<HttpResponse, PageError> {
    match failure {
        CallFailure::Rejected { message, .. } | CallFailure::NotFound { message } => {
            Ok(ActionResult::failed(message))
        }
        other => Err(site.page_error(other)),
    }
}

/// Form body of `POST /profile`. Checkboxes count as set when present.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub allow_ai_categorization: Option<String>,
    pub allow_ai_create_categories: Option<String>,
    pub ai_confidence_threshold: Option<String>,
    pub newsletter_enabled: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

impl TryFrom<ProfileForm> for ProfileUpdate {
    type Error = ProfileValidationError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        let ai_confidence_threshold =
            ProfileUpdate::parse_confidence_threshold(form.ai_confidence_threshold.as_deref())?;
        Ok(Self {
            email: non_blank(form.email),
            username: non_blank(form.username),
            allow_ai_categorization: form.allow_ai_categorization.is_some(),
            allow_ai_create_categories: form.allow_ai_create_categories.is_some(),
            ai_confidence_threshold,
            newsletter_enabled: form.newsletter_enabled.is_some(),
            newsletter_frequency: NEWSLETTER_FREQUENCY_WEEKLY.to_owned(),
        })
    }
}

/// Form body of `POST /profile/password`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Form body of `POST /profile/delete`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountForm {
    pub confirm_delete: Option<String>,
}

/// `GET /profile`: live user record and link activity, fetched together.
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let id = current.user().id;
    let api = state.client(current.token());
    let (user, activity) = session
        .guard()
        .run(try_join(api.get_user(id), api.user_activity(id)))
        .await
        .map_err(|failure| match failure {
            CallFailure::SessionExpired => PageError::login_required(),
            _ => PageError::Failure(Error::upstream(LOAD_FAILED)),
        })?;
    let total_links = activity.total();
    Ok(HttpResponse::Ok().json(ProfilePage {
        user,
        activity,
        total_links,
    }))
}

/// `POST /profile`: update the profile and refresh the stored user record.
#[post("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ProfileForm>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let update = match ProfileUpdate::try_from(form.into_inner()) {
        Ok(update) => update,
        Err(err) => return Ok(ActionResult::failed(err.to_string())),
    };
    let api = state.client(current.token());
    let user = match session
        .guard()
        .run(api.update_user(current.user().id, &update))
        .await
    {
        Ok(user) => user,
        Err(failure) => return action_failure(UPDATE, failure),
    };
    session.persist(current.token(), &user)?;
    info!(user_id = %user.id, "profile updated");
    Ok(ActionResult::ok(Some(user)))
}

/// `POST /profile/password`.
#[post("/profile/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<PasswordForm>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let change = match PasswordChange::try_from_parts(
        form.current_password.as_deref(),
        form.new_password.as_deref(),
    ) {
        Ok(change) => change,
        Err(err) => return Ok(ActionResult::failed(err.to_string())),
    };
    let api = state.client(current.token());
    match session.guard().run(api.change_password(&change)).await {
        Ok(()) => Ok(ActionResult::ok(None)),
        Err(failure) => action_failure(PASSWORD, failure),
    }
}

/// `POST /profile/delete`: delete the account after typed confirmation.
#[post("/profile/delete")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<DeleteAccountForm>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    if let Err(err) = confirm_account_deletion(form.confirm_delete.as_deref()) {
        return Ok(ActionResult::failed(err.to_string()));
    }
    let id = current.user().id;
    let api = state.client(current.token());
    if let Err(failure) = session.guard().run(api.delete_user(id)).await {
        return action_failure(DELETE, failure);
    }
    session.clear();
    info!(user_id = %id, "account deleted");
    Ok(see_other(HOME_PATH))
}
