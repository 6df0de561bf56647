//! User records and profile mutations.
//!
//! [`UserRecord`] is the cached mirror of the backend's user response that
//! lives next to the bearer token in the session. It is never authoritative:
//! pages that need live data fetch the record again through the API.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Backend identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw backend identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the authenticated user's profile.
///
/// Unknown fields sent by the backend are ignored so a newer backend does
/// not invalidate stored sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend identifier.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Optional display handle.
    #[serde(default)]
    pub username: Option<String>,
    /// Whether the backend may assign categories automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_ai_categorization: Option<bool>,
    /// Whether the backend may create new categories automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_ai_create_categories: Option<bool>,
    /// Minimum confidence for automatic categorisation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_confidence_threshold: Option<f64>,
    /// Whether the digest newsletter is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newsletter_enabled: Option<bool>,
    /// Digest cadence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newsletter_frequency: Option<String>,
}

impl UserRecord {
    /// Minimal record with only the identity fields populated.
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            username: None,
            allow_ai_categorization: None,
            allow_ai_create_categories: None,
            ai_confidence_threshold: None,
            newsletter_enabled: None,
            newsletter_frequency: None,
        }
    }
}

/// Per-day count of saved links, keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkActivity {
    /// Saved link count per calendar day.
    #[serde(default)]
    pub days: BTreeMap<String, u32>,
}

impl LinkActivity {
    /// Total number of links across all days.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.days.values().map(|count| u64::from(*count)).sum()
    }
}

/// Only cadence the backend currently supports.
pub const NEWSLETTER_FREQUENCY_WEEKLY: &str = "weekly";
/// Confidence threshold used when the form leaves it blank.
pub const DEFAULT_AI_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Validation failures for profile forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// Confidence threshold was not a number in `[0, 1]`.
    #[error("AI confidence threshold must be a number between 0 and 1")]
    InvalidConfidenceThreshold,
    /// One of the password fields was empty.
    #[error("Both current and new password are required")]
    MissingPassword,
    /// The deletion confirmation phrase did not match.
    #[error("Please type DELETE to confirm account deletion")]
    DeletionNotConfirmed,
}

/// Fields sent to `PATCH /users/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    /// New email, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New username, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Automatic categorisation toggle.
    pub allow_ai_categorization: bool,
    /// Automatic category creation toggle.
    pub allow_ai_create_categories: bool,
    /// Confidence threshold in `[0, 1]`.
    pub ai_confidence_threshold: f64,
    /// Newsletter toggle.
    pub newsletter_enabled: bool,
    /// Newsletter cadence.
    pub newsletter_frequency: String,
}

impl ProfileUpdate {
    /// Parse the confidence threshold from its raw form value.
    ///
    /// A missing or blank value falls back to
    /// [`DEFAULT_AI_CONFIDENCE_THRESHOLD`].
    pub fn parse_confidence_threshold(raw: Option<&str>) -> Result<f64, ProfileValidationError> {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(DEFAULT_AI_CONFIDENCE_THRESHOLD);
        };
        let value: f64 = raw
            .parse()
            .map_err(|_| ProfileValidationError::InvalidConfidenceThreshold)?;
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(ProfileValidationError::InvalidConfidenceThreshold)
        }
    }
}

/// Body of `PATCH /users/password`.
#[derive(Clone, Serialize)]
pub struct PasswordChange {
    #[serde(serialize_with = "expose_secret")]
    password: Zeroizing<String>,
    #[serde(serialize_with = "expose_secret")]
    new_password: Zeroizing<String>,
}

fn expose_secret<S>(secret: &Zeroizing<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(secret.as_str())
}

impl PasswordChange {
    /// Validate that both passwords are present.
    pub fn try_from_parts(
        current: Option<&str>,
        new: Option<&str>,
    ) -> Result<Self, ProfileValidationError> {
        match (current, new) {
            (Some(current), Some(new)) if !current.is_empty() && !new.is_empty() => Ok(Self {
                password: Zeroizing::new(current.to_owned()),
                new_password: Zeroizing::new(new.to_owned()),
            }),
            _ => Err(ProfileValidationError::MissingPassword),
        }
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange(<redacted>)")
    }
}

/// Phrase the user must type to delete their account.
pub const DELETE_CONFIRMATION: &str = "DELETE";

/// Check the account deletion confirmation phrase.
pub fn confirm_account_deletion(input: Option<&str>) -> Result<(), ProfileValidationError> {
    if input == Some(DELETE_CONFIRMATION) {
        Ok(())
    } else {
        Err(ProfileValidationError::DeletionNotConfirmed)
    }
}
