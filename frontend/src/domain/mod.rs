//! Domain primitives for the Stash front end.
//!
//! Purpose: strongly typed backend resources, session semantics, and the
//! ports that isolate handlers from HTTP clients and cookie stores.
//!
//! Public surface:
//! - Error / ErrorCode: handler-facing error payload.
//! - SessionValidator / Session / AuthenticatedSession: session pair checks.
//! - SessionGuard / CallFailure: 401 policy around authenticated calls.
//! - ports: `StashApi`, `StashApiFactory`, `SessionStore`.

pub mod auth;
pub mod call_guard;
pub mod category;
pub mod error;
pub mod link;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::auth::{AccessToken, AuthResponse, BearerToken, LoginCredentials, LoginValidationError};
pub use self::call_guard::{CallFailure, SessionGuard};
pub use self::category::{Category, CategoryDraft, CategoryId, CategoryValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::link::{
    ContentType, Link, LinkId, LinkStatusTab, LinkUpdate, LinkValidationError, NewLink,
    ProcessingStatus,
};
pub use self::session::{
    AuthenticatedSession, LoginRequiredReason, Session, SessionError, SessionKeys,
    SessionValidator,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DEFAULT_AI_CONFIDENCE_THRESHOLD, DELETE_CONFIRMATION, LinkActivity,
    NEWSLETTER_FREQUENCY_WEEKLY, PasswordChange, ProfileUpdate, ProfileValidationError, UserId,
    UserRecord, confirm_account_deletion,
};

/// Convenient handler result alias.
///
/// # Examples
/// ```
/// use frontend::domain::{ApiResult, Error};
///
/// fn load() -> ApiResult<()> {
///     Err(Error::not_found("Link not found"))
/// }
/// assert!(load().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
