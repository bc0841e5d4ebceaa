//! Command-line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::{Args, Parser};
use maki_edge::{CorsConfig, ProxyConfig};

/// Edge proxy for the Maki Control console.
#[derive(Debug, Clone, Parser)]
#[command(name = "maki-edge", version, about)]
pub struct Cli {
    /// Listener configuration.
    #[command(flatten)]
    pub server: ServerConfig,

    /// Outbound (backend) configuration.
    #[command(flatten)]
    pub proxy: ProxyConfig,

    /// CORS configuration for the console origins.
    #[command(flatten)]
    pub cors: CorsConfig,
}

/// HTTP listener configuration.
///
/// # Environment Variables
///
/// - `HOST` - Address to bind to (default: 127.0.0.1)
/// - `PORT` - Port to listen on (default: 3000)
/// - `SHUTDOWN_TIMEOUT` - Graceful shutdown timeout in seconds (default: 30)
#[derive(Debug, Clone, Args, serde::Serialize, serde::Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the server to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// TCP port number for the server to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum time in seconds to wait for in-flight requests on shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl ServerConfig {
    /// Validates the listener configuration.
    ///
    /// # Errors
    ///
    /// Rejects privileged ports and out-of-range timeouts.
    pub fn validate(&self) -> Result<()> {
        if self.port < 1024 {
            return Err(anyhow!(
                "port {} is below 1024; use 1024-65535 to avoid requiring root privileges",
                self.port
            ));
        }
        if self.shutdown_timeout == 0 || self.shutdown_timeout > 300 {
            return Err(anyhow!(
                "shutdown timeout {} seconds is invalid; must be between 1 and 300",
                self.shutdown_timeout
            ));
        }
        Ok(())
    }

    /// Returns the complete socket address for server binding.
    #[must_use]
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the graceful shutdown timeout as a [`Duration`].
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns whether the server binds to all interfaces.
    #[must_use]
    pub const fn binds_to_all_interfaces(&self) -> bool {
        match self.host {
            IpAddr::V4(addr) => addr.is_unspecified(),
            IpAddr::V6(addr) => addr.is_unspecified(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}
