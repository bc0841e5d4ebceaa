//! Configuration for the request gateway.

use std::time::Duration;

use url::Url;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path prefix under which the edge proxy exposes the backend.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Page the user is sent to when the session expires.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Configuration for the [`Gateway`](crate::Gateway).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Origin the gateway talks to (the edge proxy's own origin).
    pub origin: Url,
    /// Path prefix prepended to every endpoint path.
    pub api_prefix: String,
    /// Origin of the real backend, reached directly for login only.
    ///
    /// Login deliberately bypasses the edge proxy: the token it returns is
    /// what the proxy requires from then on. Defaults to `origin`.
    pub auth_origin: Option<Url>,
    /// Page navigated to when the session expires.
    pub login_path: String,
    /// Default timeout for HTTP requests.
    pub timeout: Duration,
    /// User-Agent header to send with requests.
    pub user_agent: String,
}

impl GatewayConfig {
    /// Creates a configuration pointed at the given origin.
    #[must_use]
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            auth_origin: None,
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: Self::default_user_agent(),
        }
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("maki/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Sets the backend origin used for the direct login call.
    #[must_use]
    pub fn with_auth_origin(mut self, auth_origin: Url) -> Self {
        self.auth_origin = Some(auth_origin);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the effective timeout, using the default if zero.
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Returns the effective user agent, using the default if empty.
    #[must_use]
    pub fn effective_user_agent(&self) -> String {
        if self.user_agent.is_empty() {
            Self::default_user_agent()
        } else {
            self.user_agent.clone()
        }
    }

    /// Builds the full URL for an endpoint path behind the proxy.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        let origin = self.origin.as_str().trim_end_matches('/');
        let prefix = self.api_prefix.trim_end_matches('/');
        format!("{origin}{prefix}{path}")
    }

    /// Builds the full URL for a path on the direct login origin.
    #[must_use]
    pub fn auth_url(&self, path: &str) -> String {
        let origin = self.auth_origin.as_ref().unwrap_or(&self.origin);
        format!("{}{path}", origin.as_str().trim_end_matches('/'))
    }
}
