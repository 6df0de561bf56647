//! Process settings loaded via OrthoConfig.
//!
//! Values come from `--flags`, `STASH_*` environment variables, or a config
//! file, in OrthoConfig's usual precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Invalid setting values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `api_url` is not an absolute http(s) URL.
    #[error("invalid api_url '{value}': {reason}")]
    InvalidApiUrl { value: String, reason: String },
    /// `bind_addr` is not a socket address.
    #[error("invalid bind_addr '{value}': {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_owned()
}

/// Front-end server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STASH")]
pub struct StashSettings {
    /// Base URL of the Stash REST backend.
    #[ortho_config(default = default_api_url())]
    pub api_url: String,
    /// Address the HTTP server listens on.
    #[ortho_config(default = default_bind_addr())]
    pub bind_addr: String,
    /// Per-request deadline for backend calls; unset means no deadline.
    pub request_timeout_secs: Option<u64>,
}

impl Default for StashSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            bind_addr: default_bind_addr(),
            request_timeout_secs: None,
        }
    }
}

impl StashSettings {
    /// Backend base URL, validated.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidApiUrl`] for relative or non-http URLs.
    pub fn api_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_url.as_str();
        let invalid = |reason: String| SettingsError::InvalidApiUrl {
            value: raw.to_owned(),
            reason,
        };
        let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    /// Listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_str();
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                reason: err.to_string(),
            }
        })
    }

    /// Backend request deadline, if configured. Zero disables it.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
