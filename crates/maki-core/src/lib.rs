#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Maki Core
//!
//! This crate provides the session-lifecycle primitives for the Maki Control
//! gateway stack. It holds no HTTP code: the request gateway and the edge
//! proxy both build on the types defined here.

/// Tracing target for session store operations.
pub const TRACING_TARGET_SESSION: &str = "maki_core::session";

/// Tracing target for credential slot operations.
pub const TRACING_TARGET_CREDENTIAL: &str = "maki_core::credential";

mod credential;
mod error;
mod session;
mod token;

pub use credential::{
    AUTH_COOKIE_NAME, CREDENTIAL_TTL, CredentialPersistence, CredentialSlot, MemoryCredentialSlot,
    StoredCredential,
};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use session::{MemorySessionBackend, SessionBackend, SessionSnapshot, SessionStore};
pub use token::TokenClaims;
