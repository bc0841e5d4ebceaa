//! Edge proxy configuration.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use url::Url;

use crate::error::{Error, ErrorKind, Result};

/// Configuration for the proxy's outbound leg.
///
/// # Environment Variables
///
/// - `BACKEND_API_URL` - Base URL of the real backend API
/// - `PROXY_TIMEOUT` - Outbound request timeout in seconds (default: 30)
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ProxyConfig {
    /// Base URL of the backend the proxy forwards to.
    ///
    /// This value never reaches client-side code; browsers only ever see
    /// the proxy's own origin.
    #[arg(long, env = "BACKEND_API_URL")]
    pub backend_url: Url,

    /// Maximum time in seconds to wait for the backend to answer.
    #[arg(long, env = "PROXY_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

impl ProxyConfig {
    /// Returns the outbound timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Validates the configuration before startup.
    ///
    /// # Errors
    ///
    /// Fails when the backend URL has no usable scheme or host, or when
    /// the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.backend_url.scheme(), "http" | "https") {
            return Err(ErrorKind::Internal.with_context("backend URL must be http or https"));
        }
        if self.backend_url.host_str().is_none() {
            return Err(ErrorKind::Internal.with_context("backend URL has no host"));
        }
        if self.timeout == 0 {
            return Err(ErrorKind::Internal.with_context("timeout must be positive"));
        }
        Ok(())
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins.
    /// If empty, defaults to localhost origins for development.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[arg(long, env = "CORS_MAX_AGE", default_value_t = 3600)]
    pub max_age_seconds: u64,

    /// Whether to allow credentials in CORS requests.
    ///
    /// The console authenticates with a cookie, so this defaults to on.
    #[arg(long, env = "CORS_ALLOW_CREDENTIALS", default_value_t = true)]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Development origins used when no explicit origins are configured.
    const DEV_ORIGINS: [&'static str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

    /// Converts the configured origins into header values, skipping any
    /// that do not parse.
    #[must_use]
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        let origins: Vec<&str> = if self.allowed_origins.is_empty() {
            Self::DEV_ORIGINS.to_vec()
        } else {
            self.allowed_origins.iter().map(String::as_str).collect()
        };
        origins
            .into_iter()
            .filter_map(|origin| origin.parse().ok())
            .collect()
    }

    /// Returns the preflight cache lifetime.
    #[must_use]
    pub const fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }
}

/// Creates a CORS layer based on the provided configuration.
pub(crate) fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.to_header_values())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(config.allow_credentials)
        .max_age(config.max_age())
}
