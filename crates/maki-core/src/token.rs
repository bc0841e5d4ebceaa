//! Unverified decoding of auth tokens into typed claims.
//!
//! The backend issues a signed JWT at login. Client-side code only ever
//! *reads* the embedded claims for display and routing; it never verifies
//! the signature, because authorization is enforced server-side. Decoding
//! therefore only touches the payload segment.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Claims embedded in an auth token.
///
/// This is a derived, non-authoritative view of the token: it is recomputed
/// whenever a new token is stored and must never be trusted for
/// authorization decisions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject identifier (the account this token was issued to).
    #[serde(rename = "sub")]
    pub subject: String,
    /// Role of the account, when the backend includes one.
    #[serde(default)]
    pub role: Option<String>,
    /// Issued-at, in seconds since the Unix epoch.
    #[serde(rename = "iat")]
    pub issued_at_secs: i64,
    /// Expiry, in seconds since the Unix epoch.
    #[serde(rename = "exp")]
    pub expires_at_secs: i64,
}

impl TokenClaims {
    /// Decodes the claims from a token without verifying its signature.
    ///
    /// Trust is established by provenance: the token was either just
    /// received from the login endpoint or rehydrated from storage this
    /// process wrote earlier.
    ///
    /// # Errors
    ///
    /// Returns a token error when the string is not shaped like a JWT,
    /// the payload segment is not valid base64, or the payload is not the
    /// expected JSON shape. Callers treat this as a fatal input-validation
    /// condition.
    pub fn decode(token: &str) -> Result<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
            _ => return Err(Error::token("token is not a three-segment JWT")),
        };

        let raw = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|source| Error::token("token payload is not valid base64").with_source(source))?;

        serde_json::from_slice(&raw)
            .map_err(|source| Error::token("token payload is not a claims object").with_source(source))
    }

    /// Returns the issued-at instant.
    ///
    /// # Errors
    ///
    /// Returns a token error when the embedded value is outside the
    /// representable timestamp range.
    pub fn issued_at(&self) -> Result<Timestamp> {
        Timestamp::from_second(self.issued_at_secs)
            .map_err(|source| Error::token("issued-at is out of range").with_source(source))
    }

    /// Returns the expiry instant.
    ///
    /// # Errors
    ///
    /// Returns a token error when the embedded value is outside the
    /// representable timestamp range.
    pub fn expires_at(&self) -> Result<Timestamp> {
        Timestamp::from_second(self.expires_at_secs)
            .map_err(|source| Error::token("expiry is out of range").with_source(source))
    }

    /// Checks if the token has expired based on current UTC time.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Ok(expires_at) => expires_at <= Timestamp::now(),
            Err(_) => true,
        }
    }
}
