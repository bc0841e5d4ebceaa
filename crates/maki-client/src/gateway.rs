//! The request gateway: the single chokepoint for authenticated backend
//! calls.
//!
//! Centralizing the request flow here guarantees that every feature area
//! reacts identically to session expiry and never special-cases
//! authentication failure locally. The contract, in order:
//!
//! 1. Merge a default `Content-Type: application/json` with caller headers
//!    (caller wins on conflict) and attach the session cookie.
//! 2. Issue the request against the configured origin under the `/api`
//!    prefix.
//! 3. A 401 or 403 is a fatal session-expiry signal: fire a best-effort
//!    logout call, clear both credential stores, signal the navigator, and
//!    resolve to [`Outcome::Redirecting`]. The caller never receives data
//!    on this branch.
//! 4. Anything else is folded into an [`ApiEnvelope`]; transport failures
//!    are recovered into the `NetworkError` envelope instead of escaping
//!    as errors.
//!
//! The [`Gateway::download`] variant follows the same credential and
//! expiry contract but hands back the raw response and propagates
//! transport errors, so callers can manage blob-specific cleanup.

use std::sync::Arc;

use maki_core::{AUTH_COOKIE_NAME, CredentialPersistence, Error, Result};
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::envelope::{ApiEnvelope, SUCCESS_MESSAGE};
use crate::navigator::{LoggingNavigator, Navigator};

/// Tracing target for gateway operations.
pub(crate) const TRACING_TARGET: &str = "maki_client::gateway";

/// Result of one gateway call.
///
/// `Redirecting` means the session expired mid-call: the page is being
/// abandoned and no data will ever be produced for this request. Callers
/// pattern-match instead of special-casing authentication failures.
#[must_use]
#[derive(Debug)]
pub enum Outcome<T> {
    /// The call ran to completion (successfully or not).
    Completed(T),
    /// The session expired; navigation to the login page was signalled.
    Redirecting,
}

impl<T> Outcome<T> {
    /// Maps the completed value, preserving the redirect signal.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Completed(value) => Outcome::Completed(f(value)),
            Self::Redirecting => Outcome::Redirecting,
        }
    }

    /// Returns the completed value, if any.
    pub fn into_completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Redirecting => None,
        }
    }

    /// Whether this outcome is the redirect signal.
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        matches!(self, Self::Redirecting)
    }
}

/// One browser-to-backend call: method, path, headers, body.
///
/// Built per call and not retained after the response.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Builds a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Builds a POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    /// Builds a PUT request with a JSON body.
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    /// Builds a PATCH request with a JSON body.
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path).with_body(body)
    }

    /// Builds a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header. Caller headers win over the gateway defaults.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

struct GatewayInner {
    http: Client,
    config: GatewayConfig,
    credentials: CredentialPersistence,
    navigator: Arc<dyn Navigator>,
}

/// The chokepoint every authenticated backend call flows through.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Creates a gateway with the default (logging) navigator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built.
    pub fn new(config: GatewayConfig, credentials: CredentialPersistence) -> Result<Self> {
        Self::with_navigator(config, credentials, LoggingNavigator)
    }

    /// Creates a gateway with an explicit navigator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built.
    pub fn with_navigator(
        config: GatewayConfig,
        credentials: CredentialPersistence,
        navigator: impl Navigator + 'static,
    ) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            origin = %config.origin,
            timeout_ms = config.effective_timeout().as_millis(),
            "creating gateway"
        );

        let http = Client::builder()
            .timeout(config.effective_timeout())
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|source| Error::config("failed to build HTTP client").with_source(source))?;

        Ok(Self {
            inner: Arc::new(GatewayInner {
                http,
                config,
                credentials,
                navigator: Arc::new(navigator),
            }),
        })
    }

    /// Returns the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Returns the paired credential writer.
    #[must_use]
    pub fn credentials(&self) -> &CredentialPersistence {
        &self.inner.credentials
    }

    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Performs one call and folds the response into an envelope.
    ///
    /// Never returns an error: transport failures become the
    /// `NetworkError` envelope, malformed bodies become a typed parse
    /// failure, and session expiry becomes [`Outcome::Redirecting`].
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Outcome<ApiEnvelope<T>> {
        let path = request.path.clone();
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    path = %path,
                    error = %error,
                    "transport failure"
                );
                return Outcome::Completed(ApiEnvelope::network_error());
            }
        };

        let status = response.status();
        if is_session_expiry(status) {
            self.expire_session().await;
            return Outcome::Redirecting;
        }

        let body = match parse_body(response).await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    path = %path,
                    status = status.as_u16(),
                    error = %error,
                    "unparseable response body"
                );
                return Outcome::Completed(ApiEnvelope::failure(
                    "invalid server response",
                    Value::String("ParseError".to_owned()),
                ));
            }
        };

        if !is_success(status) {
            tracing::debug!(
                target: TRACING_TARGET,
                path = %path,
                status = status.as_u16(),
                "backend reported failure"
            );
            return Outcome::Completed(ApiEnvelope::from_failure_body(&body));
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(SUCCESS_MESSAGE)
            .to_owned();

        match serde_json::from_value::<T>(body) {
            Ok(data) => Outcome::Completed(ApiEnvelope::success(message, data)),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    path = %path,
                    error = %error,
                    "response body did not match the expected shape"
                );
                Outcome::Completed(ApiEnvelope::failure(
                    "invalid server response",
                    Value::String("ParseError".to_owned()),
                ))
            }
        }
    }

    /// Performs one call and hands back the raw response.
    ///
    /// Follows the identical credential and expiry contract as
    /// [`Gateway::call`], but the body is left untouched for the caller to
    /// extract, and transport failures propagate as errors.
    ///
    /// # Errors
    ///
    /// Returns an external error when the request itself fails.
    pub async fn download(&self, request: ApiRequest) -> Result<Outcome<Response>> {
        let path = request.path.clone();
        let response = self.send(request).await.map_err(|source| {
            Error::external(format!("download of {path} failed")).with_source(source)
        })?;

        if is_session_expiry(response.status()) {
            self.expire_session().await;
            return Ok(Outcome::Redirecting);
        }
        Ok(Outcome::Completed(response))
    }

    /// Issues the request with merged headers and the session cookie.
    async fn send(&self, request: ApiRequest) -> reqwest::Result<Response> {
        let mut headers = HeaderMap::with_capacity(request.headers.len() + 2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }

        if !headers.contains_key(COOKIE)
            && let Ok(Some(token)) = self.inner.credentials.get_token()
            && let Ok(value) = HeaderValue::from_str(&format!("{AUTH_COOKIE_NAME}={token}"))
        {
            headers.insert(COOKIE, value);
        }

        let url = self.inner.config.endpoint_url(&request.path);
        let mut builder = self.inner.http.request(request.method, url).headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }
        builder.send().await
    }

    /// Reacts to a 401/403: best-effort server-side logout, paired clear
    /// of both credential stores, then the navigation signal. Runs once
    /// per expired call; the caller's flow terminates in `Redirecting`.
    async fn expire_session(&self) {
        tracing::warn!(target: TRACING_TARGET, "session expired, logging out");

        let mut builder = self
            .inner
            .http
            .post(self.inner.config.endpoint_url("/auth/logout"));
        if let Ok(Some(token)) = self.inner.credentials.get_token()
            && let Ok(value) = HeaderValue::from_str(&format!("{AUTH_COOKIE_NAME}={token}"))
        {
            builder = builder.header(COOKIE, value);
        }
        if let Err(error) = builder.send().await {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "best-effort logout call failed"
            );
        }

        if let Err(error) = self.inner.credentials.remove_token() {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "failed to clear credential slot"
            );
        }

        self.inner
            .navigator
            .navigate(&self.inner.config.login_path);
    }
}

/// Whether the status signals an expired session.
fn is_session_expiry(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Success is [200, 300); everything else takes a failure branch.
fn is_success(status: StatusCode) -> bool {
    (200..300).contains(&status.as_u16())
}

/// Reads the body as JSON; an empty body counts as `null`.
async fn parse_body(response: Response) -> std::result::Result<Value, String> {
    let text = response.text().await.map_err(|error| error.to_string())?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|error| error.to_string())
}
