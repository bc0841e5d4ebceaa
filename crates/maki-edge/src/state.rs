//! Shared state for the edge router.

use reqwest::Client;
use url::Url;

use crate::config::ProxyConfig;
use crate::error::{ErrorKind, Result};

/// Process-wide proxy state: the backend base URL and one pooled outbound
/// client, created once at startup and cloned per request.
#[derive(Debug, Clone)]
pub struct ProxyState {
    backend_url: Url,
    http: Client,
}

impl ProxyState {
    /// Creates the state from a validated configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the outbound HTTP client
    /// cannot be built.
    pub fn from_config(config: &ProxyConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("maki-edge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                ErrorKind::Internal.with_context(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self {
            backend_url: config.backend_url.clone(),
            http,
        })
    }

    /// Returns the backend base URL.
    #[must_use]
    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }

    /// Returns the pooled outbound client.
    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }
}
