//! Reqwest-backed authenticated client for the Stash backend.
//!
//! This adapter owns transport details only: URL joining, default headers,
//! JSON serialisation, and mapping responses into [`BackendError`]. It never
//! retries, caches, or touches the session.

use std::borrow::Cow;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::ports::{ApiError, BackendError, DEFAULT_ERROR_MESSAGE};
use crate::domain::{BearerToken, TRACE_ID_HEADER, TraceId};

/// One backend call: method, relative path, optional JSON body, header
/// overrides, and the message used when the error body carries none.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
    fallback_message: Cow<'static, str>,
}

impl ApiRequest {
    /// Request with no body and default headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            fallback_message: Cow::Borrowed(DEFAULT_ERROR_MESSAGE),
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PATCH path`.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `PUT path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serialise `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Encode`] when serialisation fails; nothing has
    /// been sent at that point.
    pub fn with_json<B>(mut self, body: &B) -> Result<Self, BackendError>
    where
        B: Serialize + ?Sized,
    {
        let encoded =
            serde_json::to_vec(body).map_err(|err| BackendError::encode(err.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }

    /// Override a default header, or add a new one.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Message reported when a failed response has no usable `message`.
    #[must_use]
    pub fn with_fallback_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.fallback_message = message.into();
        self
    }
}

/// Client bound to one base URL and one bearer token.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: BearerToken,
}

impl ApiClient {
    /// Bind `http` to `base_url` and `token`.
    ///
    /// One trailing `/` is trimmed from `base_url`; paths are appended
    /// verbatim.
    pub fn new(http: Client, base_url: &str, token: BearerToken) -> Self {
        Self {
            http,
            base_url: base_url.strip_suffix('/').unwrap_or(base_url).to_owned(),
            token,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET path`, decoding the response as `T`.
    pub async fn get<T>(&self, path: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        self.send(ApiRequest::get(path)).await
    }

    /// `POST path` with an optional JSON body.
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.send(with_optional_json(ApiRequest::post(path), body)?)
            .await
    }

    /// `PATCH path` with an optional JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.send(with_optional_json(ApiRequest::patch(path), body)?)
            .await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.send(ApiRequest::put(path).with_json(body)?).await
    }

    /// `DELETE path`.
    pub async fn delete<T>(&self, path: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        self.send(ApiRequest::delete(path)).await
    }

    /// Issue `request` and decode the response as `T`.
    ///
    /// A 204 decodes `T` from JSON `null` without reading the body, so use
    /// `()`, `Option<_>`, or `serde::de::IgnoredAny` for bodiless calls.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Api`] for any non-success status.
    /// - [`BackendError::Transport`] or [`BackendError::Timeout`] when no
    ///   response arrived.
    /// - [`BackendError::Decode`] when a success body does not match `T`.
    pub async fn send<T>(&self, request: ApiRequest) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let ApiRequest {
            method,
            path,
            body,
            headers: overrides,
            fallback_message,
        } = request;
        let headers = self.headers(overrides)?;
        let mut builder = self
            .http
            .request(method.clone(), self.url(&path))
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|err| {
            let mapped = map_transport_error(&err);
            warn!(%method, %path, kind = mapped.kind(), "backend request failed");
            mapped
        })?;

        let status = response.status();
        debug!(%method, %path, status = status.as_u16(), "backend responded");
        if !status.is_success() {
            let body = response.bytes().await.ok();
            let error = ApiError::from_body(status.as_u16(), body.as_deref(), &fallback_message);
            warn!(%method, %path, status = status.as_u16(), message = %error.message, "backend returned error status");
            return Err(error.into());
        }
        if status == StatusCode::NO_CONTENT {
            return decode_body(status, None);
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| map_transport_error(&err))?;
        decode_body(status, Some(body.as_ref()))
    }

    fn headers(&self, overrides: HeaderMap) -> Result<HeaderMap, BackendError> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token.as_str()))
            .map_err(|_| BackendError::encode("bearer token is not a valid header value"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(trace_id) = TraceId::current()
            && let Ok(value) = HeaderValue::from_str(&trace_id.to_string())
        {
            headers.insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        for name in overrides.keys() {
            headers.remove(name);
        }
        for (name, value) in &overrides {
            headers.append(name.clone(), value.clone());
        }
        Ok(headers)
    }
}

fn with_optional_json<B>(request: ApiRequest, body: Option<&B>) -> Result<ApiRequest, BackendError>
where
    B: Serialize + ?Sized,
{
    match body {
        Some(body) => request.with_json(body),
        None => Ok(request),
    }
}

fn decode_body<T>(status: StatusCode, body: Option<&[u8]>) -> Result<T, BackendError>
where
    T: DeserializeOwned,
{
    let decoded = match body {
        Some(bytes) => serde_json::from_slice(bytes),
        None => T::deserialize(Value::Null),
    };
    decoded.map_err(|err| BackendError::decode(status.as_u16(), err.to_string()))
}

fn map_transport_error(error: &reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::timeout(error.to_string())
    } else {
        BackendError::transport(error.to_string())
    }
}
