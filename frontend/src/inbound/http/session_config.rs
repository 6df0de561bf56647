//! Session cookie configuration read from the environment.
//!
//! Every toggle follows the same rule: debug builds warn and fall back to a
//! default when a variable is missing or malformed, release builds refuse to
//! start. The signing key is read from `SESSION_KEY_FILE`.

use std::path::PathBuf;

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const COOKIE_NAME_ENV: &str = "SESSION_COOKIE_NAME";
const TTL_DAYS_ENV: &str = "SESSION_TTL_DAYS";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const COOKIE_NAME_EXPECTED: &str = "non-empty ASCII token";
const TTL_EXPECTED: &str = "whole number of days >= 1";

/// Cookie name used when `SESSION_COOKIE_NAME` is unset.
pub const DEFAULT_COOKIE_NAME: &str = "stash_session";
/// Session lifetime used when `SESSION_TTL_DAYS` is unset.
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Warn and fall back to defaults.
    Debug,
    /// Require explicit, valid values.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Whether the cookie carries `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy.
    pub same_site: SameSite,
    /// Cookie name.
    pub cookie_name: String,
    /// Persistent cookie lifetime.
    pub ttl: Duration,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable holds an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is shorter than release builds accept.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without `Secure` in a release build.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from `env`.
///
/// # Examples
///
/// ```rust
/// use frontend::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.cookie_name, "stash_session");
/// ```
///
/// # Errors
///
/// Returns [`SessionConfigError`] when a release build is missing a toggle,
/// a toggle is malformed, or the key file is unusable.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = Toggle::new(COOKIE_SECURE_ENV, BOOL_EXPECTED).resolve(
        env,
        mode,
        parse_bool,
        true,
    )?;
    let same_site = Toggle::new(SAMESITE_ENV, SAMESITE_EXPECTED).resolve(
        env,
        mode,
        parse_same_site,
        SameSite::Lax,
    )?;
    if same_site == SameSite::None && !cookie_secure {
        if mode.is_debug() {
            warn!("SESSION_SAMESITE=None without SESSION_COOKIE_SECURE; browsers may drop the cookie");
        } else {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
    }
    let allow_ephemeral = Toggle::new(ALLOW_EPHEMERAL_ENV, BOOL_EXPECTED).resolve(
        env,
        mode,
        parse_bool,
        false,
    )?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let cookie_name = optional(env, COOKIE_NAME_ENV, COOKIE_NAME_EXPECTED, parse_cookie_name)?
        .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_owned());
    let ttl_days = optional(env, TTL_DAYS_ENV, TTL_EXPECTED, parse_ttl_days)?
        .unwrap_or(DEFAULT_TTL_DAYS);
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        cookie_name,
        ttl: Duration::days(ttl_days),
    })
}

/// A variable that release builds must set explicitly.
struct Toggle {
    name: &'static str,
    expected: &'static str,
}

impl Toggle {
    const fn new(name: &'static str, expected: &'static str) -> Self {
        Self { name, expected }
    }

    fn resolve<E, T, P>(
        &self,
        env: &E,
        mode: BuildMode,
        parse: P,
        debug_default: T,
    ) -> Result<T, SessionConfigError>
    where
        E: Env,
        P: Fn(&str) -> Option<T>,
    {
        let Some(value) = env.string(self.name) else {
            if mode.is_debug() {
                warn!(name = self.name, "session toggle not set; using debug default");
                return Ok(debug_default);
            }
            return Err(SessionConfigError::MissingEnv { name: self.name });
        };
        if let Some(parsed) = parse(&value) {
            return Ok(parsed);
        }
        if mode.is_debug() {
            warn!(name = self.name, value = %value, "invalid session toggle; using debug default");
            Ok(debug_default)
        } else {
            Err(SessionConfigError::InvalidEnv {
                name: self.name,
                value,
                expected: self.expected,
            })
        }
    }
}

/// A variable with a default in every build mode; only malformed values fail.
fn optional<E, T, P>(
    env: &E,
    name: &'static str,
    expected: &'static str,
    parse: P,
) -> Result<Option<T>, SessionConfigError>
where
    E: Env,
    P: Fn(&str) -> Option<T>,
{
    env.string(name)
        .map(|value| {
            parse(&value).ok_or(SessionConfigError::InvalidEnv {
                name,
                value,
                expected,
            })
        })
        .transpose()
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

fn parse_cookie_name(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.'));
    valid.then(|| trimmed.to_owned())
}

fn parse_ttl_days(value: &str) -> Option<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|days| (1..=365).contains(days))
}

#[cfg(test)]
mod tests;
