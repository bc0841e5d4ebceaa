#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Maki Edge
//!
//! Each incoming request is handled independently and statelessly; the only
//! shared state is the configuration and one pooled outbound HTTP client,
//! both created once at startup.

/// Tracing target for proxy forwarding.
pub const TRACING_TARGET_PROXY: &str = "maki_edge::proxy";

/// Tracing target for the local auth routes.
pub const TRACING_TARGET_AUTH: &str = "maki_edge::auth";

mod auth;
mod config;
mod error;
mod middleware;
mod proxy;
mod routes;
mod state;

pub use config::{CorsConfig, ProxyConfig};
pub use error::{Error, ErrorKind, Result};
pub use middleware::RouterMiddlewareExt;
pub use routes::routes;
pub use state::ProxyState;
