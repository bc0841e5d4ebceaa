//! Credential persistence: the durable token slot paired with the session
//! store.
//!
//! The slot is the Rust counterpart of the `auth-token` cookie: it outlives
//! the in-memory session store and is written with a fixed 3-day expiry.
//! The two stores must never diverge, so every write goes through
//! [`CredentialPersistence`], which updates both within the same call.

use std::sync::{Arc, Mutex, PoisonError};

use jiff::{SignedDuration, Timestamp};

use crate::TRACING_TARGET_CREDENTIAL;
use crate::error::{Error, Result};
use crate::session::SessionStore;
use crate::token::TokenClaims;

/// Name of the cookie carrying the credential token.
pub const AUTH_COOKIE_NAME: &str = "auth-token";

/// Fixed lifetime of a stored credential: 3 days.
pub const CREDENTIAL_TTL: SignedDuration = SignedDuration::from_hours(72);

/// A durable slot holding at most one credential token.
pub trait CredentialSlot: Send + Sync {
    /// Stores a token with the given expiry, replacing any previous one.
    fn set(&self, token: &str, expires_at: Timestamp) -> Result<()>;

    /// Returns the stored token, or `None` when absent or expired.
    fn get(&self) -> Result<Option<String>>;

    /// Deletes the slot. Deleting an empty slot is a no-op.
    fn remove(&self) -> Result<()>;
}

/// In-memory [`CredentialSlot`] that honors the stored expiry.
#[derive(Debug, Default)]
pub struct MemoryCredentialSlot {
    slot: Mutex<Option<(String, Timestamp)>>,
}

impl MemoryCredentialSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(String, Timestamp)>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialSlot for MemoryCredentialSlot {
    fn set(&self, token: &str, expires_at: Timestamp) -> Result<()> {
        *self.lock() = Some((token.to_owned(), expires_at));
        Ok(())
    }

    fn get(&self) -> Result<Option<String>> {
        let mut slot = self.lock();
        match slot.as_ref() {
            Some((_, expires_at)) if *expires_at <= Timestamp::now() => {
                // Lazy expiry: the slot behaves as if the cookie had lapsed.
                *slot = None;
                Ok(None)
            }
            Some((token, _)) => Ok(Some(token.clone())),
            None => Ok(None),
        }
    }

    fn remove(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

/// Receipt returned by a successful credential write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// The decoded identity the session now holds.
    pub claims: TokenClaims,
    /// When the durable slot lapses.
    pub expires_at: Timestamp,
}

/// Paired writer for the credential slot and the session store.
#[derive(Clone)]
pub struct CredentialPersistence {
    slot: Arc<dyn CredentialSlot>,
    session: SessionStore,
}

impl std::fmt::Debug for CredentialPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPersistence")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl CredentialPersistence {
    /// Creates a paired writer over the given slot and session store.
    pub fn new(slot: impl CredentialSlot + 'static, session: SessionStore) -> Self {
        Self {
            slot: Arc::new(slot),
            session,
        }
    }

    /// Returns the session store this writer is paired with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Stores a freshly issued token in both stores.
    ///
    /// The session store is updated first (decoding the claims in the
    /// process), then the durable slot is written with the fixed 3-day
    /// expiry.
    ///
    /// # Errors
    ///
    /// Fails when no token was supplied, when the token cannot be decoded,
    /// or when the slot write fails.
    pub fn set_token(&self, token: &str) -> Result<StoredCredential> {
        if token.is_empty() {
            return Err(Error::credential("no token provided"));
        }

        let claims = self.session.set_token(token)?;
        let expires_at = Timestamp::now() + CREDENTIAL_TTL;
        self.slot.set(token, expires_at)?;

        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL,
            subject = %claims.subject,
            expires_at = %expires_at,
            "credential stored"
        );
        Ok(StoredCredential { claims, expires_at })
    }

    /// Returns the stored token, or `None` when absent or expired.
    ///
    /// # Errors
    ///
    /// Propagates slot read failures.
    pub fn get_token(&self) -> Result<Option<String>> {
        self.slot.get()
    }

    /// Deletes the credential from both stores. Used at logout.
    ///
    /// # Errors
    ///
    /// Propagates slot deletion failures; the session is cleared first so
    /// the in-memory state never outlives a failed slot write.
    pub fn remove_token(&self) -> Result<()> {
        self.session.logout();
        self.slot.remove()?;
        tracing::debug!(target: TRACING_TARGET_CREDENTIAL, "credential removed");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;
    use crate::error::ErrorKind;

    fn mint_token(subject: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({
                "sub": subject,
                "iat": 1_700_000_000,
                "exp": 4_102_444_800_i64,
            })
            .to_string(),
        );
        format!("{header}.{payload}.sig")
    }

    fn persistence() -> CredentialPersistence {
        CredentialPersistence::new(MemoryCredentialSlot::new(), SessionStore::in_memory())
    }

    #[test]
    fn token_round_trips_through_both_stores() -> anyhow::Result<()> {
        let persistence = persistence();
        let token = mint_token("admin@makicontrol.com");

        let stored = persistence.set_token(&token)?;
        assert_eq!(stored.claims.subject, "admin@makicontrol.com");

        assert_eq!(persistence.get_token()?.as_deref(), Some(token.as_str()));
        assert_eq!(persistence.session().user(), Some(stored.claims));
        assert!(persistence.session().is_authenticated());
        Ok(())
    }

    #[test]
    fn empty_token_is_rejected() {
        let persistence = persistence();
        let error = persistence.set_token("").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Credential);
        assert!(!persistence.session().is_authenticated());
    }

    #[test]
    fn remove_clears_both_stores() -> anyhow::Result<()> {
        let persistence = persistence();
        persistence.set_token(&mint_token("admin@makicontrol.com"))?;

        persistence.remove_token()?;
        assert_eq!(persistence.get_token()?, None);
        assert!(!persistence.session().is_authenticated());

        // Removing again is a no-op.
        persistence.remove_token()?;
        Ok(())
    }

    #[test]
    fn expired_slot_reads_as_absent() -> anyhow::Result<()> {
        let slot = MemoryCredentialSlot::new();
        slot.set("stale-token", Timestamp::from_second(0)?)?;
        assert_eq!(slot.get()?, None);
        Ok(())
    }

    #[test]
    fn stored_expiry_is_three_days_out() -> anyhow::Result<()> {
        let persistence = persistence();
        let before = Timestamp::now() + CREDENTIAL_TTL;
        let stored = persistence.set_token(&mint_token("admin@makicontrol.com"))?;
        let after = Timestamp::now() + CREDENTIAL_TTL;

        assert!(stored.expires_at >= before && stored.expires_at <= after);
        Ok(())
    }
}
