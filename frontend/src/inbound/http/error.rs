//! HTTP adapter mapping for domain errors and page outcomes.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting handlers
//! return redirects, inline form errors, and failures through one `Result`.

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::domain::{CallFailure, Error, ErrorCode, TRACE_ID_HEADER};

/// Where a rejected or expired session is sent.
pub const LOGIN_PATH: &str = "/login";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::UpstreamFailure | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// `303 See Other` to `location`.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location.to_owned()))
        .finish()
}

#[derive(Serialize)]
struct FormRejection<'a> {
    invalid: bool,
    message: &'a str,
}

/// Non-success outcome of a loader or action.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PageError {
    /// Leave the page; used for login-required and post-action redirects.
    #[error("redirect to {location}")]
    Redirect { location: String },
    /// Inline form rejection rendered as `{ invalid: true, message }`.
    #[error("{message}")]
    Form { status: u16, message: String },
    /// Any other failure.
    #[error(transparent)]
    Failure(#[from] Error),
}

impl PageError {
    /// Redirect to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    /// Redirect to the login page.
    #[must_use]
    pub fn login_required() -> Self {
        Self::redirect(LOGIN_PATH)
    }

    /// Inline form rejection.
    pub fn form(status: u16, message: impl Into<String>) -> Self {
        Self::Form {
            status,
            message: message.into(),
        }
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Redirect { .. } => StatusCode::SEE_OTHER,
            Self::Form { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::Failure(err) => err.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Redirect { location } => see_other(location),
            Self::Form { message, .. } => HttpResponse::build(self.status_code()).json(FormRejection {
                invalid: true,
                message,
            }),
            Self::Failure(err) => err.error_response(),
        }
    }
}

/// Call-site messages used when a backend call fails.
///
/// The backend's own message is shown for rejected input; not-found and
/// unavailable failures use the messages configured here.
#[derive(Debug, Clone, Copy)]
pub struct CallSite {
    failure: &'static str,
    not_found: Option<&'static str>,
}

impl CallSite {
    /// Call site reporting `failure` for unavailable backends.
    #[must_use]
    pub const fn new(failure: &'static str) -> Self {
        Self {
            failure,
            not_found: None,
        }
    }

    /// Override the message shown for a 404.
    #[must_use]
    pub const fn not_found(mut self, message: &'static str) -> Self {
        self.not_found = Some(message);
        self
    }

    /// Translate a classified failure into a page outcome.
    #[must_use]
    pub fn page_error(&self, failure: CallFailure) -> PageError {
        match failure {
            CallFailure::SessionExpired => PageError::login_required(),
            CallFailure::Rejected {
                status, message, ..
            } => PageError::form(status, message),
            CallFailure::NotFound { message } => {
                PageError::Failure(Error::not_found(self.not_found.map_or(message, str::to_owned)))
            }
            CallFailure::Unavailable { .. } => PageError::Failure(Error::upstream(self.failure)),
        }
    }
}

#[cfg(test)]
mod tests;
